//! Google Identity Services
//!
//! The client library is loaded asynchronously by `index.html`.

use anyhow::anyhow;
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = initialize, catch)]
    fn initialize(config: &Object) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = renderButton, catch)]
    fn render_button(parent: &HtmlElement, options: &Object) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = disableAutoSelect, catch)]
    fn disable_auto_select() -> Result<(), JsValue>;
}

fn js_error(err: &JsValue) -> anyhow::Error {
    anyhow!(err
        .as_string()
        .unwrap_or_else(|| "unknown JS error".to_string()))
}

fn set(obj: &Object, key: &str, value: &JsValue) -> anyhow::Result<()> {
    Reflect::set(obj, &key.into(), value).map_err(|err| js_error(&err))?;
    Ok(())
}

/// `true` as soon as the client library has been loaded.
pub fn is_available() -> bool {
    Reflect::get(&js_sys::global(), &"google".into()).is_ok_and(|google| !google.is_undefined())
}

/// The client ID the library has been initialized with.
///
/// The library keeps its callback for the lifetime of the page,
/// so it is initialized only once per client ID.
#[derive(Debug, Default)]
pub struct Initialization {
    client_id: Option<String>,
}

impl Initialization {
    fn is_required(&self, client_id: &str) -> bool {
        self.client_id.as_deref() != Some(client_id)
    }

    fn completed(&mut self, client_id: &str) {
        self.client_id = Some(client_id.to_string());
    }
}

fn initialize_client<F>(client_id: &str, on_credential: F) -> anyhow::Result<()>
where
    F: Fn(String) + 'static,
{
    let callback = Closure::<dyn Fn(JsValue)>::new(move |response: JsValue| {
        let credential = Reflect::get(&response, &"credential".into())
            .ok()
            .and_then(|c| c.as_string());
        match credential {
            Some(credential) => on_credential(credential),
            None => log::warn!("Google sign-in response without credential"),
        }
    });
    let config = Object::new();
    set(&config, "client_id", &client_id.into())?;
    set(&config, "callback", callback.as_ref())?;
    initialize(&config).map_err(|err| js_error(&err))?;
    callback.forget();
    Ok(())
}

/// Render the sign-in button into `parent`.
///
/// `on_credential` receives the ID token of every successful sign-in.
/// It is only registered by the first call for a client ID.
pub fn render_sign_in_button<F>(
    initialization: &mut Initialization,
    client_id: &str,
    parent: &HtmlElement,
    on_credential: F,
) -> anyhow::Result<()>
where
    F: Fn(String) + 'static,
{
    if initialization.is_required(client_id) {
        log::debug!("Initialize Google Identity Services");
        initialize_client(client_id, on_credential)?;
        initialization.completed(client_id);
    }
    let options = Object::new();
    set(&options, "theme", &"outline".into())?;
    set(&options, "size", &"large".into())?;
    render_button(parent, &options).map_err(|err| js_error(&err))?;
    Ok(())
}

/// Prevent an automatic sign-in right after a logout.
pub fn sign_out() {
    if !is_available() {
        return;
    }
    if let Err(err) = disable_auto_select() {
        log::warn!("Unable to disable auto select: {}", js_error(&err));
    }
}
