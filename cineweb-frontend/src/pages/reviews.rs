use leptos::*;
use web_sys::File;

use cineweb_core::{
    boundary::{Coordinate, Review},
    form::{PendingUploads, ReviewDraft, Submission, UploadShape},
    modal::{ClickTarget, DetailModal},
    render,
    reviews::{ReviewDetail, EMPTY_MESSAGE, LOAD_ERROR},
    Resource,
};

use crate::{api, components::*, AppState};

#[component]
pub fn Reviews() -> impl IntoView {
    let state = expect_context::<AppState>();

    // -- signals -- //

    let reviews = create_rw_signal(Resource::<Review>::new(LOAD_ERROR));
    let details = create_rw_signal(DetailModal::<ReviewDetail>::default());
    let pin = create_rw_signal(None::<render::Marker>);

    // -- memos -- //

    let frame = create_memo(move |_| {
        reviews.with(|r| {
            state
                .settings
                .with_value(|s| render::render(r.items(), EMPTY_MESSAGE, &s.map))
        })
    });
    let list = Signal::derive(move || frame.with(|f| f.list.clone()));

    // -- callbacks -- //

    let reload = move || state.load(reviews, |api| async move { api.reviews().await });

    let on_select = Callback::new(move |id: String| {
        let Some(user_api) = state.user_api() else {
            return;
        };
        details.update(|d| {
            d.open(&id);
        });
        spawn_local(async move {
            let result = user_api
                .review(&id)
                .await
                .map(ReviewDetail::from)
                .map_err(api::failure);
            if let Some(effect) = details.try_update(|d| d.loaded(&id, result)) {
                state.apply(effect);
            }
        });
    });

    // -- init -- //

    reload();

    view! {
      <section>
        <h2>"Reviews"</h2>
        <AddressSearch pin />
        <CollectionMap frame=Signal::from(frame) on_select pin=Signal::from(pin) />
        <CardList list on_select />
        <ReviewForm on_created = move || reload() />
      </section>
      <Show when = move || details.with(DetailModal::is_visible)>
        <Modal
          on_click = move |target: ClickTarget| details.update(|d| d.click(target))
          on_close = move || details.update(DetailModal::close)
        >
          { move || match details.with(|d| d.item().cloned()) {
              Some(detail) => view! { <ReviewDetails detail /> }.into_view(),
              None => view! { <p>"Loading..."</p> }.into_view(),
            }
          }
        </Modal>
      </Show>
    }
}

#[component]
fn ReviewDetails(detail: ReviewDetail) -> impl IntoView {
    let ReviewDetail {
        name,
        address,
        position,
        rating,
        image_urls,
        author,
        created_at,
        token,
        token_issued_at,
        token_expires_at,
        ..
    } = detail;
    let row = |label: &'static str, value: Option<String>| {
        value.map(|value| view! { <dt>{ label }</dt><dd>{ value }</dd> })
    };
    view! {
      <h3>{ name.clone() }</h3>
      <p>"📍 "{ address }</p>
      <p>"🌍 "{ position }</p>
      <p class="rating">{ rating }</p>
      <div class="uploads">
        { image_urls.into_iter().map(|src| view! { <img src=src alt=name.clone() /> }).collect_view() }
      </div>
      <dl>
        { row("Author", author) }
        { row("Created", created_at) }
        { row("Token", token) }
        { row("Token issued", token_issued_at) }
        { row("Token expires", token_expires_at) }
      </dl>
    }
}

/// Centers the map on an address that is geocoded by the backend.
#[component]
fn AddressSearch(pin: RwSignal<Option<render::Marker>>) -> impl IntoView {
    let state = expect_context::<AppState>();
    let (address, set_address) = create_signal(String::new());

    let search = create_action(move |address: &String| {
        let address = address.trim().to_string();
        let user_api = state.user_api();
        async move {
            let Some(user_api) = user_api else {
                return;
            };
            if address.is_empty() {
                return;
            }
            match user_api.geocode(&address).await {
                Ok(result) => {
                    let position = Coordinate::from(result);
                    pin.set(Some(render::Marker {
                        id: String::new(),
                        position,
                        title: address,
                        popup_lines: vec![],
                    }));
                }
                Err(err) => state.fail(&api::failure(err), "Address not found"),
            }
        }
    });

    view! {
      <form on:submit = move |ev| {
          ev.prevent_default();
          search.dispatch(address.get_untracked());
      }>
        <input
          type="text"
          placeholder="Search an address on the map"
          prop:value = address
          on:input = move |ev| set_address.set(event_target_value(&ev))
        />
        <button type="submit" disabled = move || search.pending().get()>"Search"</button>
      </form>
    }
}

#[component]
fn ReviewForm<F>(on_created: F) -> impl IntoView
where
    F: Fn() + Copy + 'static,
{
    let state = expect_context::<AppState>();
    let (shape, folder) = state
        .settings
        .with_value(|s| (s.uploads.review_shape, s.uploads.review_folder.clone()));

    // -- signals -- //

    let draft = create_rw_signal(ReviewDraft {
        rating: "5".to_string(),
        ..ReviewDraft::default()
    });
    let uploads = create_rw_signal(PendingUploads::new());
    let files = create_rw_signal(Vec::<File>::new());
    let submission = create_rw_signal(Submission::new("Unable to save the review"));
    let error = create_rw_signal(None::<String>);

    // -- callbacks -- //

    let reset = move || {
        draft.set(ReviewDraft {
            rating: "5".to_string(),
            ..ReviewDraft::default()
        });
        clear_uploads(uploads);
        files.set(vec![]);
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let on_success = move || {
            state.notify_success("Review saved");
            reset();
            on_created();
        };
        match shape {
            UploadShape::PreUploaded => {
                let validated = uploads.with_untracked(|u| {
                    draft.with_untracked(|d| d.validate_with_uploads(u))
                });
                match validated {
                    Ok((review, urls)) => state.submit(
                        submission,
                        error,
                        move |api| async move { api.create_review_with_urls(&review, &urls).await },
                        on_success,
                    ),
                    Err(err) => error.set(Some(err.to_string())),
                }
            }
            UploadShape::Bundled => match draft.with_untracked(ReviewDraft::validate) {
                Ok(review) => {
                    let files = files.get_untracked();
                    state.submit(
                        submission,
                        error,
                        move |api| async move { api.create_review_bundled(&review, &files).await },
                        on_success,
                    );
                }
                Err(err) => error.set(Some(err.to_string())),
            },
        }
    };

    view! {
      <form on:submit=on_submit>
        <h3>"New review"</h3>
        <label>
          "Name"
          <input
            type="text"
            prop:value = move || draft.with(|d| d.name.clone())
            on:input = move |ev| draft.update(|d| d.name = event_target_value(&ev))
          />
        </label>
        <label>
          "Address"
          <input
            type="text"
            prop:value = move || draft.with(|d| d.address.clone())
            on:input = move |ev| draft.update(|d| d.address = event_target_value(&ev))
          />
        </label>
        <label>
          "Rating"
          <select
            prop:value = move || draft.with(|d| d.rating.clone())
            on:change = move |ev| draft.update(|d| d.rating = event_target_value(&ev))
          >
            { (1..=5).rev().map(|n| view! { <option value=n.to_string()>{ "⭐".repeat(n) }</option> }).collect_view() }
          </select>
        </label>
        { match shape {
            UploadShape::PreUploaded => view! { <ImageUploads uploads folder /> }.into_view(),
            UploadShape::Bundled => view! { <BundledImages files /> }.into_view(),
          }
        }
        { move || error.get().map(|e| view! { <p class="form-error">{ e }</p> }) }
        <button
          type="submit"
          disabled = move || submission.with(Submission::is_busy)
        >
          { move || submission.with(|s| s.label("Save review", "Saving...")) }
        </button>
      </form>
    }
}
