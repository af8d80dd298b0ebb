use leptos::*;

use cineweb_core::{
    cinema::{MovieSearch as Search, SearchResult, MOVIE_NOT_FOUND, NO_SCREENINGS},
    render::{self, Frame},
};

use crate::{api, components::*, AppState};

#[component]
pub fn MovieSearch() -> impl IntoView {
    let state = expect_context::<AppState>();

    let search = create_rw_signal(Search::new());
    let (title, set_title) = create_signal(String::new());

    let run = create_action(move |title: &String| {
        let user_api = state.user_api();
        let started = search.try_update(|s| s.begin(title)).flatten();
        async move {
            let (Some(user_api), Some((generation, title))) = (user_api, started) else {
                return;
            };
            let result = user_api.search_movie(&title).await.map_err(api::failure);
            if let Some(effect) = search.try_update(|s| s.finish(generation, result)) {
                state.apply(effect);
            }
        }
    });

    let frame = create_memo(move |_| {
        search.with(|s| match s.result() {
            SearchResult::Found(found) => state
                .settings
                .with_value(|settings| render::render(&found.screenings, NO_SCREENINGS, &settings.map)),
            _ => Frame::empty(NO_SCREENINGS),
        })
    });
    let list = Signal::derive(move || frame.with(|f| f.list.clone()));
    let movie = Signal::derive(move || {
        search.with(|s| match s.result() {
            SearchResult::Found(found) => Some(found.movie.clone()),
            _ => None,
        })
    });

    view! {
      <section>
        <h2>"Where is it screened?"</h2>
        <form on:submit = move |ev| {
            ev.prevent_default();
            run.dispatch(title.get_untracked());
        }>
          <input
            type="text"
            placeholder="Movie title"
            prop:value = title
            on:input = move |ev| set_title.set(event_target_value(&ev))
          />
          <button type="submit" disabled = move || run.pending().get()>
            { move || if run.pending().get() { "Searching..." } else { "Search" } }
          </button>
        </form>
        { move || match search.with(|s| s.result().clone()) {
            SearchResult::None => ().into_view(),
            SearchResult::Searching => view! { <p>"Searching..."</p> }.into_view(),
            SearchResult::NotFound => view! { <p class="empty">{ MOVIE_NOT_FOUND }</p> }.into_view(),
            SearchResult::Found(_) => ().into_view(),
          }
        }
        <Show when = move || movie.with(Option::is_some)>
          { move || movie.get().map(|m| view! {
              <h3>{ m.title.clone() }</h3>
              { m.image_url.map(|src| view! { <img class="poster" src=src alt=m.title /> }) }
            })
          }
          <CollectionMap frame=Signal::from(frame) />
          <CardList list />
        </Show>
      </section>
    }
}
