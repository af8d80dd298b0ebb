use std::{future::Future, time::Duration};

use leptos::*;
use leptos_router::*;

use cineweb_core::{
    boundary::PublicConfig,
    form::{SubmitOutcome, Submission},
    notify::{Level, Notifications},
    Failure, LoadEffect, Resource, SessionController, Settings, View,
};

mod api;
mod google;
mod storage;

mod pages;
use pages::*;

mod components;
use components::*;

use self::storage::LocalTokenStore;

type Session = SessionController<LocalTokenStore>;

const TOAST_DURATION: Duration = Duration::from_secs(6);
const SETTINGS_ELEMENT_ID: &str = "cineweb-settings";

/// Settings that a deployment embeds into the page as TOML.
fn load_settings() -> Settings {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(SETTINGS_ELEMENT_ID))
        .and_then(|e| e.text_content());
    Settings::with_overrides(document.as_deref())
}

/// State that is shared by all pages.
#[derive(Clone, Copy)]
pub struct AppState {
    pub settings: StoredValue<Settings>,
    pub session: RwSignal<Session>,
    pub notifications: RwSignal<Notifications>,
    pub google_sign_in: StoredValue<google::Initialization>,
    public_api: StoredValue<api::PublicApi>,
}

impl AppState {
    fn new(settings: Settings) -> Self {
        let store = LocalTokenStore::new(settings.token_storage_key.clone());
        let public_api = api::PublicApi::new(settings.api_url.clone());
        Self {
            settings: store_value(settings),
            session: create_rw_signal(SessionController::new(store)),
            notifications: create_rw_signal(Notifications::default()),
            google_sign_in: store_value(google::Initialization::default()),
            public_api: store_value(public_api),
        }
    }

    pub fn public_api(&self) -> api::PublicApi {
        self.public_api.get_value()
    }

    /// The API of the current session.
    pub fn user_api(&self) -> Option<api::UserApi> {
        let token = self
            .session
            .with_untracked(|s| s.token().map(ToString::to_string))?;
        Some(self.public_api().user_api(token))
    }

    fn notify(&self, level: Level, message: impl Into<String>) {
        let notifications = self.notifications;
        let mut id = 0;
        notifications.update(|n| id = n.push(level, message));
        set_timeout(
            move || {
                notifications.try_update(|n| n.dismiss(id));
            },
            TOAST_DURATION,
        );
    }

    pub fn notify_error(&self, message: impl Into<String>) {
        self.notify(Level::Error, message);
    }

    pub fn notify_success(&self, message: impl Into<String>) {
        self.notify(Level::Success, message);
    }

    /// Carry out the effect of a load.
    ///
    /// Returns `true` if the new state has been applied.
    pub fn apply(&self, effect: LoadEffect) -> bool {
        match effect {
            LoadEffect::Applied => true,
            LoadEffect::Logout => {
                self.unauthorized();
                false
            }
            LoadEffect::Notify(message) => {
                self.notify_error(message);
                false
            }
            LoadEffect::Stale => false,
        }
    }

    /// Handle a failed request that has no state of its own.
    pub fn fail(&self, failure: &Failure, generic: &str) {
        if failure.is_unauthorized() {
            self.unauthorized();
        } else {
            log::warn!("{generic}: {failure}");
            self.notify_error(failure.user_message(generic));
        }
    }

    pub fn unauthorized(&self) {
        let mut logged_out = false;
        self.session.update(|s| logged_out = s.unauthorized());
        if logged_out {
            self.notify_error("Your session has expired, please log in again");
        }
    }

    /// Replace the collection with a freshly fetched one.
    pub fn load<T, F, Fut>(&self, resource: RwSignal<Resource<T>>, fetch: F)
    where
        T: 'static,
        F: FnOnce(api::UserApi) -> Fut + 'static,
        Fut: Future<Output = Result<Vec<T>, api::Error>> + 'static,
    {
        let Some(user_api) = self.user_api() else {
            log::warn!("Unable to load data: not logged in");
            return;
        };
        let Some(ticket) = resource.try_update(Resource::begin_load) else {
            return;
        };
        let state = *self;
        spawn_local(async move {
            let result = fetch(user_api).await.map_err(api::failure);
            if let Some(effect) = resource.try_update(|r| r.finish_load(ticket, result)) {
                state.apply(effect);
            }
        });
    }

    /// Send a validated form.
    ///
    /// Nothing happens while a previous submission is in flight.
    /// A failure is reported through `error`.
    pub fn submit<F, Fut, S>(
        &self,
        submission: RwSignal<Submission>,
        error: RwSignal<Option<String>>,
        send: F,
        on_success: S,
    ) where
        F: FnOnce(api::UserApi) -> Fut + 'static,
        Fut: Future<Output = Result<(), api::Error>> + 'static,
        S: FnOnce() + 'static,
    {
        let Some(user_api) = self.user_api() else {
            return;
        };
        let Some(ticket) = submission.try_update(Submission::begin).flatten() else {
            return;
        };
        error.set(None);
        let state = *self;
        spawn_local(async move {
            let result = send(user_api).await.map_err(api::failure);
            let Some(outcome) = submission.try_update(|s| s.finish(ticket, result)) else {
                return;
            };
            match outcome {
                SubmitOutcome::Success => on_success(),
                SubmitOutcome::Failed(message) => {
                    state.notify_error(message.clone());
                    error.set(Some(message));
                }
                SubmitOutcome::Logout => state.unauthorized(),
                SubmitOutcome::Stale => {}
            }
        });
    }

    pub fn logout(&self) {
        log::info!("Logout");
        google::sign_out();
        self.session.update(|s| {
            s.logout();
        });
    }
}

#[component]
#[must_use]
pub fn App() -> impl IntoView {
    let state = AppState::new(load_settings());
    provide_context(state);

    // -- signals -- //

    let public_config = create_rw_signal(None::<PublicConfig>);
    let current_view = Signal::derive(move || state.session.with(SessionController::view));
    let user = Signal::derive(move || state.session.with(|s| s.user().cloned()));

    // -- actions -- //

    let fetch_config = create_action(move |()| async move {
        match state.public_api().config().await {
            Ok(config) => {
                public_config.set(Some(config));
            }
            Err(err) => {
                state.fail(&api::failure(err), "Unable to load the configuration");
            }
        }
    });

    let verify_token = create_action(move |token: &String| {
        let api = state.public_api().user_api(token.clone());
        async move {
            match api.verify().await {
                Ok(verification) => {
                    let Some(user) = verification.user else {
                        return;
                    };
                    state.session.update(|s| {
                        s.verification_succeeded(user);
                    });
                }
                Err(err) => {
                    let failure = api::failure(err);
                    state.session.update(|s| {
                        s.verification_failed(&failure);
                    });
                }
            }
        }
    });

    let login = create_action(move |credential: &String| {
        let credential = credential.clone();
        async move {
            match state.public_api().login_with_google(&credential).await {
                Ok(session) => {
                    state.session.update(|s| {
                        s.complete_login(session);
                    });
                }
                Err(err) => {
                    let failure = api::failure(err);
                    let mut message = String::new();
                    state.session.update(|s| message = s.login_failed(&failure));
                    state.notify_error(message);
                }
            }
        }
    });

    // -- callbacks -- //

    let on_logout = move || state.logout();
    let on_credential = Callback::new(move |credential: String| login.dispatch(credential));

    // -- init -- //

    fetch_config.dispatch(());
    let mut stored_token = None;
    state.session.update(|s| stored_token = s.restore_session());
    if let Some(token) = stored_token {
        verify_token.dispatch(token);
    }

    view! {
      <Router>
        <Show
          when = move || current_view.get() == View::App
          fallback = move || view! {
            <Login
              client_id = Signal::derive(move || public_config.with(|c| c.as_ref().and_then(|c| c.google_client_id.clone())))
              verifying = verify_token.pending().into()
              on_credential
            />
          }
        >
          <NavBar user on_logout />
          <main>
            <Routes>
              <Route path=Page::Reviews.path() view=Reviews />
              <Route path=Page::Movies.path() view=Movies />
              <Route path=Page::Rooms.path() view=Rooms />
              <Route path=Page::Screenings.path() view=Screenings />
              <Route path=Page::MovieSearch.path() view=MovieSearch />
            </Routes>
          </main>
        </Show>
        <Toasts />
      </Router>
    }
}

pub fn run() {
    mount_to_body(|| view! { <App /> });
}
