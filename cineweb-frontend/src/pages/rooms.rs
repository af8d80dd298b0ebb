use leptos::*;

use cineweb_core::{
    autocomplete::AddressAutocomplete,
    boundary::Room,
    cinema::{self, NO_ROOMS},
    form::{RoomDraft, Submission},
    render, Resource,
};

use crate::{components::*, AppState};

const LOAD_ERROR: &str = "Unable to load the rooms";

#[component]
pub fn Rooms() -> impl IntoView {
    let state = expect_context::<AppState>();

    let rooms = create_rw_signal(Resource::<Room>::new(LOAD_ERROR));
    let frame = create_memo(move |_| {
        rooms.with(|r| {
            state
                .settings
                .with_value(|s| render::render(r.items(), NO_ROOMS, &s.map))
        })
    });
    let list = Signal::derive(move || frame.with(|f| f.list.clone()));

    let reload = move || state.load(rooms, |api| async move { api.rooms().await });
    reload();

    view! {
      <section>
        <h2>"Rooms"</h2>
        <CollectionMap frame=Signal::from(frame) />
        <CardList list />
        <RoomForm rooms on_created = move || reload() />
      </section>
    }
}

#[component]
fn RoomForm<F>(rooms: RwSignal<Resource<Room>>, on_created: F) -> impl IntoView
where
    F: Fn() + Copy + 'static,
{
    let state = expect_context::<AppState>();
    let settings = state.settings.with_value(|s| s.autocomplete.clone());

    let name = create_rw_signal(String::new());
    let autocomplete = create_rw_signal(AddressAutocomplete::new(settings));
    let submission = create_rw_signal(Submission::new("Unable to save the room"));
    let error = create_rw_signal(None::<String>);

    let duplicate = Signal::derive(move || {
        name.with(|name| rooms.with(|r| cinema::find_rooms_by_name(r.items(), name).next().is_some()))
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let draft = autocomplete.with_untracked(|a| RoomDraft {
            name: name.get_untracked(),
            address: a.text().to_string(),
            coordinates: a.fields().clone(),
        });
        match draft.validate() {
            Ok(room) => state.submit(
                submission,
                error,
                move |api| async move { api.create_room(&room).await },
                move || {
                    state.notify_success("Room saved");
                    name.set(String::new());
                    autocomplete.update(AddressAutocomplete::reset);
                    on_created();
                },
            ),
            Err(err) => error.set(Some(err.to_string())),
        }
    };

    view! {
      <form on:submit=on_submit>
        <h3>"New room"</h3>
        <label>
          "Name"
          <input
            type="text"
            prop:value = name
            on:input = move |ev| name.set(event_target_value(&ev))
          />
        </label>
        <Show when = move || duplicate.get()>
          <p class="form-hint">"A room with this name already exists"</p>
        </Show>
        <AddressInput autocomplete />
        { move || error.get().map(|e| view! { <p class="form-error">{ e }</p> }) }
        <button type="submit" disabled = move || submission.with(Submission::is_busy)>
          { move || submission.with(|s| s.label("Save room", "Saving...")) }
        </button>
      </form>
    }
}
