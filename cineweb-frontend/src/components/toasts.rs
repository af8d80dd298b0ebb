use leptos::*;

use cineweb_core::notify::{Level, Notification};

use crate::AppState;

const fn level_class(level: Level) -> &'static str {
    match level {
        Level::Info => "toast",
        Level::Success => "toast success",
        Level::Warning => "toast warning",
        Level::Error => "toast error",
    }
}

/// Non-blocking notifications, dismissed by a click.
#[component]
pub fn Toasts() -> impl IntoView {
    let notifications = expect_context::<AppState>().notifications;
    let items = Signal::derive(move || {
        notifications.with(|n| n.iter().cloned().collect::<Vec<Notification>>())
    });

    view! {
      <div class="toasts">
        <For
          each = move || items.get()
          key = |n| n.id
          let:n
        >
          <div
            class = level_class(n.level)
            on:click = move |_| notifications.update(|all| { all.dismiss(n.id); })
          >
            { n.message }
          </div>
        </For>
      </div>
    }
}
