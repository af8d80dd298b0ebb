use gloo_net::http::Request;
use web_sys::AbortSignal;

use cineweb_boundary::GeocodingSuggestion;

use crate::{into_json, Result};

/// Address search of a Nominatim instance.
#[derive(Clone)]
pub struct GeocodingApi {
    url: String,
    limit: u8,
}

impl GeocodingApi {
    #[must_use]
    pub const fn new(url: String, limit: u8) -> Self {
        Self { url, limit }
    }

    /// The request is cancelled if the given signal is aborted.
    pub async fn search(
        &self,
        text: &str,
        signal: Option<&AbortSignal>,
    ) -> Result<Vec<GeocodingSuggestion>> {
        let limit = self.limit.to_string();
        let response = Request::get(&self.url)
            .query(search_params(text, &limit))
            .header("Accept", "application/json")
            .abort_signal(signal)
            .send()
            .await?;
        into_json(response).await
    }
}

fn search_params<'a>(text: &'a str, limit: &'a str) -> [(&'static str, &'a str); 4] {
    [
        ("format", "json"),
        ("limit", limit),
        ("addressdetails", "1"),
        ("q", text),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_parameters() {
        let params = search_params("Gran Via", "5");
        assert!(params.contains(&("format", "json")));
        assert!(params.contains(&("limit", "5")));
        assert!(params.contains(&("addressdetails", "1")));
        assert!(params.contains(&("q", "Gran Via")));
    }
}
