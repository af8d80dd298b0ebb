use leptos::*;

use cineweb_core::modal::ClickTarget;

/// An overlay that is closed by its close button
/// or by a click outside of its content.
#[component]
pub fn Modal<F, C>(on_click: F, on_close: C, children: Children) -> impl IntoView
where
    F: Fn(ClickTarget) + Copy + 'static,
    C: Fn() + Copy + 'static,
{
    view! {
      <div class="modal-backdrop" on:click = move |_| on_click(ClickTarget::Backdrop)>
        <div
          class="modal"
          on:click = move |ev| {
              ev.stop_propagation();
              on_click(ClickTarget::Content);
          }
        >
          <button class="close" on:click = move |ev| {
              ev.stop_propagation();
              on_close();
          }>"✕"</button>
          { children() }
        </div>
      </div>
    }
}
