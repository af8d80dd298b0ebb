use std::time::Duration;

use leptos::{html::Div, *};

use crate::{google, AppState};

const RETRY_INTERVAL: Duration = Duration::from_millis(200);
const MAX_RETRIES: u32 = 50;

fn render_button(
    client_id: String,
    container: NodeRef<Div>,
    google_sign_in: StoredValue<google::Initialization>,
    on_credential: Callback<String>,
    retries: u32,
) {
    let Some(div) = container.get_untracked() else {
        return;
    };
    if !google::is_available() {
        if retries == 0 {
            log::error!("Google Identity Services are not available");
            return;
        }
        set_timeout(
            move || {
                render_button(
                    client_id,
                    container,
                    google_sign_in,
                    on_credential,
                    retries - 1,
                );
            },
            RETRY_INTERVAL,
        );
        return;
    }
    let rendered = google_sign_in.try_update_value(|init| {
        google::render_sign_in_button(init, &client_id, &div, move |credential| {
            on_credential.call(credential);
        })
    });
    if let Some(Err(err)) = rendered {
        log::error!("Unable to render the sign-in button: {err}");
    }
}

#[component]
pub fn Login(
    client_id: Signal<Option<String>>,
    verifying: Signal<bool>,
    on_credential: Callback<String>,
) -> impl IntoView {
    let google_sign_in = expect_context::<AppState>().google_sign_in;
    let container = create_node_ref::<Div>();
    let (mounted, set_mounted) = create_signal(false);
    container.on_load(move |_| set_mounted.set(true));

    Effect::new(move |_| {
        if !mounted.get() {
            return;
        }
        if let Some(client_id) = client_id.get() {
            render_button(client_id, container, google_sign_in, on_credential, MAX_RETRIES);
        }
    });

    view! {
      <section class="login">
        <div>
          <h1>"CineWeb"</h1>
          <Show
            when = move || verifying.get()
            fallback = || view! { <p>"Please sign in with your Google account."</p> }
          >
            <p>"Restoring your session..."</p>
          </Show>
          <div node_ref=container></div>
        </div>
      </section>
    }
}
