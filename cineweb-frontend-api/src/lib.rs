use gloo_net::http::Response;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen::JsValue;

mod geocoding;
mod multipart;
mod public;
mod user;

pub use self::{geocoding::*, multipart::*, public::*, user::*};

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Fetch(String),

    #[error("Request failed with status {status}")]
    Api {
        status: u16,
        message: Option<String>,
    },
}

impl Error {
    /// Interpret the body of a non-2xx response.
    ///
    /// The backend reports errors as `{"error": "..."}`,
    /// other bodies (e.g. HTML error pages of a proxy) are ignored.
    #[must_use]
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<cineweb_boundary::Error>(body)
            .ok()
            .map(|e| e.error);
        Self::Api { status, message }
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Fetch(_) => None,
        }
    }
}

impl From<gloo_net::Error> for Error {
    fn from(err: gloo_net::Error) -> Self {
        Self::Fetch(format!("{err}"))
    }
}

impl From<JsValue> for Error {
    fn from(err: JsValue) -> Self {
        Self::Fetch(
            err.as_string()
                .unwrap_or_else(|| "unknown JS error".to_string()),
        )
    }
}

pub async fn into_json<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    // ensure we've got 2xx status
    if response.ok() {
        Ok(response.json().await?)
    } else {
        Err(into_error(response).await)
    }
}

/// Like [`into_json`] but ignores the body of a 2xx response.
pub async fn into_unit(response: Response) -> Result<()> {
    if response.ok() {
        Ok(())
    } else {
        Err(into_error(response).await)
    }
}

async fn into_error(response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Error::from_response_body(status, &body)
}

// Keep the characters that are safe within a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a single path segment, e.g. a movie title.
#[must_use]
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}
