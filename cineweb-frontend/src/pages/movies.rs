use leptos::*;

use cineweb_core::{
    boundary::Movie,
    cinema::NO_MOVIES,
    form::{MovieDraft, PendingUploads, Submission},
    render,
    Resource,
};

use crate::{components::*, AppState};

const LOAD_ERROR: &str = "Unable to load the movies";

#[component]
pub fn Movies() -> impl IntoView {
    let state = expect_context::<AppState>();

    let movies = create_rw_signal(Resource::<Movie>::new(LOAD_ERROR));
    let list = create_memo(move |_| {
        movies.with(|m| {
            state
                .settings
                .with_value(|s| render::render(m.items(), NO_MOVIES, &s.map).list)
        })
    });

    let reload = move || state.load(movies, |api| async move { api.movies().await });
    reload();

    view! {
      <section>
        <h2>"Movies"</h2>
        <Show when = move || movies.with(Resource::is_loading)>
          <p>"Loading..."</p>
        </Show>
        <CardList list />
        <MovieForm on_created = move || reload() />
      </section>
    }
}

#[component]
fn MovieForm<F>(on_created: F) -> impl IntoView
where
    F: Fn() + Copy + 'static,
{
    let state = expect_context::<AppState>();
    let folder = state
        .settings
        .with_value(|s| s.uploads.movie_folder.clone());

    let draft = create_rw_signal(MovieDraft::default());
    let uploads = create_rw_signal(PendingUploads::new());
    let submission = create_rw_signal(Submission::new("Unable to save the movie"));
    let error = create_rw_signal(None::<String>);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let validated = uploads.with_untracked(|u| draft.with_untracked(|d| d.validate(u)));
        match validated {
            Ok(movie) => state.submit(
                submission,
                error,
                move |api| async move { api.create_movie(&movie).await },
                move || {
                    state.notify_success("Movie saved");
                    draft.set(MovieDraft::default());
                    // The image now belongs to the movie.
                    clear_uploads(uploads);
                    on_created();
                },
            ),
            Err(err) => error.set(Some(err.to_string())),
        }
    };

    view! {
      <form on:submit=on_submit>
        <h3>"New movie"</h3>
        <label>
          "Title"
          <input
            type="text"
            prop:value = move || draft.with(|d| d.title.clone())
            on:input = move |ev| draft.update(|d| d.title = event_target_value(&ev))
          />
        </label>
        <ImageUploads uploads folder multiple=false />
        { move || error.get().map(|e| view! { <p class="form-error">{ e }</p> }) }
        <button type="submit" disabled = move || submission.with(Submission::is_busy)>
          { move || submission.with(|s| s.label("Save movie", "Saving...")) }
        </button>
      </form>
    }
}
