use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{File, HtmlInputElement, Url};

use cineweb_core::form::{self, LocalPreviewId, PendingUploads};

use crate::{api, AppState};

const ACCEPT: &str = "image/png,image/jpeg,image/gif,image/webp";

fn selected_files(ev: &ev::Event) -> Vec<File> {
    let Some(input) = ev
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
    else {
        return vec![];
    };
    let files = input
        .files()
        .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
        .unwrap_or_default();
    // Allow to select the same file again.
    input.set_value("");
    files
}

fn allowed_mime_types() -> Vec<String> {
    expect_context::<AppState>()
        .settings
        .with_value(|s| s.uploads.allowed_mime_types.clone())
}

/// Remove an image that is no longer referenced by the form.
fn delete_remote_image(state: AppState, public_id: String) {
    let Some(api) = state.user_api() else {
        return;
    };
    spawn_local(async move {
        if let Err(err) = api.delete_image(&public_id).await {
            log::warn!("Unable to delete image {public_id}: {err}");
        }
    });
}

/// Images that are uploaded right after they have been selected.
#[component]
pub fn ImageUploads(
    uploads: RwSignal<PendingUploads>,
    folder: String,
    #[prop(default = true)] multiple: bool,
) -> impl IntoView {
    let state = expect_context::<AppState>();
    let allowed = store_value(allowed_mime_types());
    let folder = store_value(folder);

    let upload = move |id: LocalPreviewId, file: File| {
        let Some(api) = state.user_api() else {
            uploads.update(|u| {
                u.failed(id);
            });
            return;
        };
        spawn_local(async move {
            let result = api.upload_image(&folder.get_value(), &file).await;
            match result {
                Ok(image) => {
                    let public_id = image.public_id.clone();
                    let mut kept = false;
                    _ = uploads.try_update(|u| kept = u.uploaded(id, image));
                    if !kept {
                        delete_remote_image(state, public_id);
                    }
                }
                Err(err) => {
                    _ = uploads.try_update(|u| u.failed(id));
                    state.fail(&api::failure(err), "Unable to upload the image");
                }
            }
        });
    };

    let on_change = move |ev: ev::Event| {
        for file in selected_files(&ev) {
            let info = api::file_info(&file);
            let mut added = None;
            if !multiple {
                let previous = uploads.with_untracked(|u| u.entries().to_vec());
                for entry in previous {
                    remove(state, uploads, entry.id);
                }
            }
            uploads.update(|u| added = Some(allowed.with_value(|a| u.add(&info, a))));
            match added {
                Some(Ok(id)) => {
                    if let Ok(url) = Url::create_object_url_with_blob(&file) {
                        uploads.update(|u| u.set_preview_url(id, url));
                    }
                    upload(id, file);
                }
                Some(Err(err)) => state.notify_error(err.to_string()),
                None => {}
            }
        }
    };

    let entries = Signal::derive(move || uploads.with(|u| u.entries().to_vec()));

    view! {
      <label>
        "Images"
        <input type="file" accept=ACCEPT multiple=multiple on:change=on_change />
      </label>
      <div class="uploads">
        <For
          each = move || entries.get()
          key = |e| (e.id, e.is_pending())
          let:entry
        >
          <figure class={ if entry.is_pending() { "pending" } else { "" } }>
            { entry.preview_url.clone().map(|src| view! { <img src=src alt=entry.file_name.clone() /> }) }
            <figcaption>
              { if entry.is_pending() { "Uploading..." } else { "Uploaded" } }
              <button type="button" on:click = move |_| remove(state, uploads, entry.id)>"Remove"</button>
            </figcaption>
          </figure>
        </For>
      </div>
    }
}

fn remove(state: AppState, uploads: RwSignal<PendingUploads>, id: LocalPreviewId) {
    let mut removed = None;
    uploads.update(|u| removed = u.remove(id));
    let Some(entry) = removed else {
        return;
    };
    if let Some(url) = &entry.preview_url {
        _ = Url::revoke_object_url(url);
    }
    if let Some(image) = entry.uploaded() {
        delete_remote_image(state, image.public_id.clone());
    }
}

/// Revoke the previews and forget all images,
/// e.g. after a successful submission.
pub fn clear_uploads(uploads: RwSignal<PendingUploads>) {
    uploads.update(|u| {
        for url in u.entries().iter().filter_map(|e| e.preview_url.as_ref()) {
            _ = Url::revoke_object_url(url);
        }
        u.clear();
    });
}

/// Images that are sent together with the form.
#[component]
pub fn BundledImages(files: RwSignal<Vec<File>>) -> impl IntoView {
    let state = expect_context::<AppState>();
    let allowed = store_value(allowed_mime_types());

    let on_change = move |ev: ev::Event| {
        let selected = selected_files(&ev);
        let infos: Vec<_> = selected.iter().map(api::file_info).collect();
        match allowed.with_value(|a| form::validate_images(&infos, a)) {
            Ok(()) => files.set(selected),
            Err(err) => {
                files.set(vec![]);
                state.notify_error(err.to_string());
            }
        }
    };

    view! {
      <label>
        "Images"
        <input type="file" accept=ACCEPT multiple=true on:change=on_change />
      </label>
      <ul>
        { move || files.with(|files| files.iter().map(|f| view! { <li>{ f.name() }</li> }).collect_view()) }
      </ul>
    }
}
