use gloo_net::http::Request;
use web_sys::RequestCredentials;

use cineweb_boundary::{GoogleCredential, PublicConfig, Session};

use crate::{into_json, Result, UserApi};

/// Unauthenticated CineWeb API
#[derive(Clone)]
pub struct PublicApi {
    url: String,
}

impl PublicApi {
    #[must_use]
    pub const fn new(url: String) -> Self {
        Self { url }
    }

    pub async fn config(&self) -> Result<PublicConfig> {
        let url = format!("{}/config", self.url);
        let response = Request::get(&url).send().await?;
        into_json(response).await
    }

    /// Exchange the credential issued by Google Identity Services
    /// for a backend session.
    pub async fn login_with_google(&self, credential: &str) -> Result<Session> {
        let url = format!("{}/auth/google", self.url);
        let response = Request::post(&url)
            .credentials(RequestCredentials::Include)
            .json(&GoogleCredential {
                token: credential.to_string(),
            })?
            .send()
            .await?;
        into_json(response).await
    }

    #[must_use]
    pub fn user_api(&self, token: String) -> UserApi {
        UserApi::new(self.url.clone(), token)
    }
}
