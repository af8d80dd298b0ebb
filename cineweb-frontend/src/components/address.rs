use std::time::Duration;

use leptos::*;
use web_sys::AbortController;

use cineweb_core::{
    autocomplete::{AddressAutocomplete, Command, Query},
    boundary::Coordinate,
};

use crate::{api, components::PreviewMap, AppState};

/// Pending timer and request of the autocomplete.
#[derive(Default)]
struct Pending {
    timer: Option<TimeoutHandle>,
    request: Option<AbortController>,
}

impl Pending {
    fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.clear();
        }
        if let Some(request) = self.request.take() {
            request.abort();
        }
    }
}

/// Free-text address with suggestions, coordinate fields
/// and a preview map with a draggable marker.
#[component]
pub fn AddressInput(
    autocomplete: RwSignal<AddressAutocomplete>,
    #[prop(default = "Address")] label: &'static str,
) -> impl IntoView {
    let state = expect_context::<AppState>();
    let geocoding = state.settings.with_value(|s| {
        api::GeocodingApi::new(
            s.autocomplete.nominatim_url.clone(),
            s.autocomplete.result_limit,
        )
    });
    let pending = store_value(Pending::default());

    // -- actions -- //

    let query = create_action(move |q: &Query| {
        let Query { generation, text } = q.clone();
        let geocoding = geocoding.clone();
        let controller = AbortController::new().ok();
        let signal = controller.as_ref().map(AbortController::signal);
        pending.update_value(|p| p.request = controller);
        async move {
            log::debug!("Search address '{text}'");
            let result = geocoding
                .search(&text, signal.as_ref())
                .await
                .map_err(api::failure);
            _ = autocomplete.try_update(|a| a.suggestions_received(generation, result));
        }
    });

    // -- callbacks -- //

    let on_input = move |text: String| {
        pending.update_value(Pending::cancel);
        let command = autocomplete.try_update(|a| a.input(&text));
        let Some(Command::Schedule {
            generation,
            delay_ms,
        }) = command
        else {
            return;
        };
        let fire = move || {
            let q = autocomplete
                .try_update(|a| a.debounce_elapsed(generation))
                .flatten();
            if let Some(q) = q {
                query.dispatch(q);
            }
        };
        match set_timeout_with_handle(fire, Duration::from_millis(delay_ms.into())) {
            Ok(handle) => pending.update_value(|p| p.timer = Some(handle)),
            Err(err) => log::warn!("Unable to start timer: {err:?}"),
        }
    };

    on_cleanup(move || {
        pending.try_update_value(Pending::cancel);
    });

    // -- signals -- //

    let suggestions = Signal::derive(move || {
        autocomplete.with(|a| {
            a.suggestions()
                .iter()
                .map(|s| s.display_name.clone())
                .enumerate()
                .collect::<Vec<_>>()
        })
    });
    let preview = Signal::derive(move || autocomplete.with(AddressAutocomplete::preview));

    view! {
      <label>
        { label }
        <input
          type="text"
          autocomplete="off"
          prop:value = move || autocomplete.with(|a| a.text().to_string())
          on:input = move |ev| on_input(event_target_value(&ev))
        />
      </label>
      <Show when = move || autocomplete.with(AddressAutocomplete::is_open)>
        <ul class="suggestions">
          <For
            each = move || suggestions.get()
            key = |(idx, name)| (*idx, name.clone())
            let:suggestion
          >
            <li on:click = move |_| { autocomplete.update(|a| { a.select(suggestion.0); }); }>
              { suggestion.1.clone() }
            </li>
          </For>
        </ul>
      </Show>
      <label>
        "Latitude"
        <input
          type="number"
          step="any"
          prop:value = move || autocomplete.with(|a| a.fields().lat.clone())
          on:input = move |ev| autocomplete.update(|a| a.set_lat(&event_target_value(&ev)))
        />
      </label>
      <label>
        "Longitude"
        <input
          type="number"
          step="any"
          prop:value = move || autocomplete.with(|a| a.fields().lng.clone())
          on:input = move |ev| autocomplete.update(|a| a.set_lng(&event_target_value(&ev)))
        />
      </label>
      <Show when = move || preview.get().is_some()>
        <PreviewMap
          position = preview
          on_drag = move |c: Coordinate| autocomplete.update(|a| a.marker_dragged(c))
        />
      </Show>
    }
}
