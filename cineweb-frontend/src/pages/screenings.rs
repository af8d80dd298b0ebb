use leptos::*;

use cineweb_core::{
    boundary::{Movie, Room, Screening},
    cinema::{self, NO_SCREENINGS},
    form::{ScreeningDraft, Submission},
    render::{ListView, Renderable},
    Resource,
};

use crate::{components::*, AppState};

const LOAD_ERROR: &str = "Unable to load the screenings";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Filter {
    #[default]
    All,
    Room(String),
    Movie(String),
}

impl Filter {
    fn parse(kind: &str, value: String) -> Self {
        if value.is_empty() {
            return Self::All;
        }
        match kind {
            "room" => Self::Room(value),
            "movie" => Self::Movie(value),
            _ => Self::All,
        }
    }
}

/// Cards of the screenings per room, ordered by date.
fn grouped(screenings: &[Screening]) -> Vec<(String, ListView)> {
    cinema::group_by_room(screenings)
        .into_iter()
        .map(|(room, screenings)| {
            let cards = screenings.into_iter().map(|s| s.card()).collect();
            (room, ListView::Cards(cards))
        })
        .collect()
}

#[component]
pub fn Screenings() -> impl IntoView {
    let state = expect_context::<AppState>();

    let screenings = create_rw_signal(Resource::<Screening>::new(LOAD_ERROR));
    let rooms = create_rw_signal(Resource::<Room>::new("Unable to load the rooms"));
    let movies = create_rw_signal(Resource::<Movie>::new("Unable to load the movies"));
    let filter = create_rw_signal(Filter::default());

    let groups = create_memo(move |_| screenings.with(|s| grouped(s.items())));

    let reload = move || match filter.get_untracked() {
        Filter::All => state.load(screenings, |api| async move { api.screenings().await }),
        Filter::Room(name) => state.load(screenings, move |api| async move {
            api.screenings_by_room(&name).await
        }),
        Filter::Movie(title) => state.load(screenings, move |api| async move {
            api.screenings_by_movie(&title).await
        }),
    };

    let on_filter = move |kind: &str, value: String| {
        filter.set(Filter::parse(kind, value));
        reload();
    };

    state.load(rooms, |api| async move { api.rooms().await });
    state.load(movies, |api| async move { api.movies().await });
    reload();

    let room_names = Signal::derive(move || {
        rooms.with(|r| r.items().iter().map(|r| r.name.clone()).collect::<Vec<_>>())
    });
    let movie_titles = Signal::derive(move || {
        movies.with(|m| m.items().iter().map(|m| m.title.clone()).collect::<Vec<_>>())
    });

    view! {
      <section>
        <h2>"Screenings"</h2>
        <div class="filters">
          <NameSelect
            label="Room"
            names=room_names
            selected = Signal::derive(move || match filter.get() { Filter::Room(n) => n, _ => String::new() })
            on_change = move |name| on_filter("room", name)
          />
          <NameSelect
            label="Movie"
            names=movie_titles
            selected = Signal::derive(move || match filter.get() { Filter::Movie(t) => t, _ => String::new() })
            on_change = move |title| on_filter("movie", title)
          />
        </div>
        { move || {
            let groups = groups.get();
            if groups.is_empty() {
                return view! { <p class="empty">{ NO_SCREENINGS }</p> }.into_view();
            }
            groups
                .into_iter()
                .map(|(room, list)| view! {
                  <h3>{ room }</h3>
                  <CardList list = Signal::derive(move || list.clone()) />
                })
                .collect_view()
          }
        }
        <ScreeningForm rooms movies on_created = move || reload() />
      </section>
    }
}

/// A select of names where the empty value means "all".
#[component]
fn NameSelect<F>(
    label: &'static str,
    names: Signal<Vec<String>>,
    selected: Signal<String>,
    on_change: F,
) -> impl IntoView
where
    F: Fn(String) + 'static,
{
    view! {
      <label>
        { label }
        <select
          prop:value = selected
          on:change = move |ev| on_change(event_target_value(&ev))
        >
          <option value="">"All"</option>
          { move || names.get().into_iter().map(|n| view! { <option value=n.clone()>{ n }</option> }).collect_view() }
        </select>
      </label>
    }
}

#[component]
fn ScreeningForm<F>(
    rooms: RwSignal<Resource<Room>>,
    movies: RwSignal<Resource<Movie>>,
    on_created: F,
) -> impl IntoView
where
    F: Fn() + Copy + 'static,
{
    let state = expect_context::<AppState>();

    let draft = create_rw_signal(ScreeningDraft::default());
    let submission = create_rw_signal(Submission::new("Unable to save the screening"));
    let error = create_rw_signal(None::<String>);

    // Rooms and movies are referenced by name, so duplicates are ambiguous.
    let ambiguous = Signal::derive(move || {
        draft.with(|d| {
            let rooms = rooms.with(|r| cinema::find_rooms_by_name(r.items(), &d.room_name).count());
            let movies =
                movies.with(|m| cinema::find_movies_by_title(m.items(), &d.movie_title).count());
            let mut hints = vec![];
            if rooms > 1 {
                hints.push(format!("{rooms} rooms are named \"{}\"", d.room_name));
            }
            if movies > 1 {
                hints.push(format!("{movies} movies are titled \"{}\"", d.movie_title));
            }
            hints
        })
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        match draft.with_untracked(ScreeningDraft::validate) {
            Ok(screening) => state.submit(
                submission,
                error,
                move |api| async move { api.create_screening(&screening).await },
                move || {
                    state.notify_success("Screening saved");
                    draft.set(ScreeningDraft::default());
                    on_created();
                },
            ),
            Err(err) => error.set(Some(err.to_string())),
        }
    };

    let options = move |names: Vec<String>| {
        names
            .into_iter()
            .map(|n| view! { <option value=n.clone()>{ n }</option> })
            .collect_view()
    };

    view! {
      <form on:submit=on_submit>
        <h3>"New screening"</h3>
        <label>
          "Room"
          <select
            prop:value = move || draft.with(|d| d.room_name.clone())
            on:change = move |ev| draft.update(|d| d.room_name = event_target_value(&ev))
          >
            <option value="">"Select a room"</option>
            { move || options(rooms.with(|r| r.items().iter().map(|r| r.name.clone()).collect())) }
          </select>
        </label>
        <label>
          "Movie"
          <select
            prop:value = move || draft.with(|d| d.movie_title.clone())
            on:change = move |ev| draft.update(|d| d.movie_title = event_target_value(&ev))
          >
            <option value="">"Select a movie"</option>
            { move || options(movies.with(|m| m.items().iter().map(|m| m.title.clone()).collect())) }
          </select>
        </label>
        <label>
          "Date"
          <input
            type="datetime-local"
            prop:value = move || draft.with(|d| d.starts_at.clone())
            on:input = move |ev| draft.update(|d| d.starts_at = event_target_value(&ev))
          />
        </label>
        { move || ambiguous.get().into_iter().map(|hint| view! { <p class="form-hint">{ hint }</p> }).collect_view() }
        { move || error.get().map(|e| view! { <p class="form-error">{ e }</p> }) }
        <button type="submit" disabled = move || submission.with(Submission::is_busy)>
          { move || submission.with(|s| s.label("Save screening", "Saving...")) }
        </button>
      </form>
    }
}
