use leptos::*;

use cineweb_core::render::{Card, ListView};

/// The list part of a rendered collection.
#[component]
pub fn CardList(
    #[prop(into)] list: Signal<ListView>,
    /// Called with the id of the card whose details are requested.
    #[prop(optional, into)]
    on_select: Option<Callback<String>>,
) -> impl IntoView {
    move || match list.get() {
        ListView::Empty(message) => view! { <p class="empty">{ message }</p> }.into_view(),
        ListView::Cards(cards) => view! {
          <ul class="cards">
            <For
              each = move || cards.clone()
              key = |card| card.id.clone()
              let:card
            >
              <CardItem card on_select />
            </For>
          </ul>
        }
        .into_view(),
    }
}

#[component]
fn CardItem(card: Card, on_select: Option<Callback<String>>) -> impl IntoView {
    let Card {
        id,
        title,
        lines,
        rating,
        image_url,
    } = card;
    view! {
      <li class="card">
        { image_url.map(|src| view! { <img src=src alt=title.clone() loading="lazy" /> }) }
        <h3>{ title.clone() }</h3>
        { lines.into_iter().map(|line| view! { <p>{ line }</p> }).collect_view() }
        { rating.map(|r| view! { <p class="rating">{ r }</p> }) }
        { on_select.map(|on_select| view! {
            <button on:click = move |_| on_select.call(id.clone())>"View details"</button>
          })
        }
      </li>
    }
}
