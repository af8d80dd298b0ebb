use serde::{Deserialize, Serialize};

use crate::{boundary::Coordinate, form::UploadShape};

const DEFAULT_CONFIG_FILE: &str = include_str!("cineweb.default.toml");

/// Static client settings.
///
/// The runtime part of the configuration (e.g. the Google client ID)
/// is fetched from the backend, see [`crate::boundary::PublicConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    pub api_url: String,
    pub token_storage_key: String,
    pub map: Map,
    pub autocomplete: Autocomplete,
    pub uploads: Uploads,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Map {
    pub tile_layer_url: String,
    pub attribution: String,
    pub default_center: Coordinate,
    pub default_zoom: f64,
    /// Zoom level used when the map is centered on a single point.
    pub detail_zoom: f64,
    pub fit_bounds_padding: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Autocomplete {
    pub nominatim_url: String,
    pub debounce_ms: u32,
    pub min_query_len: usize,
    pub result_limit: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Uploads {
    pub review_shape: UploadShape,
    pub review_folder: String,
    pub movie_folder: String,
    pub allowed_mime_types: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration")
    }
}

impl Settings {
    /// Settings of a deployment.
    ///
    /// A missing, blank or invalid document yields the defaults.
    #[must_use]
    pub fn with_overrides(document: Option<&str>) -> Self {
        let Some(document) = document.map(str::trim).filter(|d| !d.is_empty()) else {
            return Self::default();
        };
        Self::from_toml_str(document).unwrap_or_else(|err| {
            log::warn!("Invalid settings, using the defaults: {err}");
            Self::default()
        })
    }

    /// Load settings from a TOML document.
    ///
    /// Missing sections are taken from the defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        let raw: RawSettings = toml::from_str(s)?;
        let defaults = Self::default();
        let RawSettings {
            api_url,
            token_storage_key,
            map,
            autocomplete,
            uploads,
        } = raw;
        Ok(Self {
            api_url: api_url.unwrap_or(defaults.api_url),
            token_storage_key: token_storage_key.unwrap_or(defaults.token_storage_key),
            map: map.unwrap_or(defaults.map),
            autocomplete: autocomplete.unwrap_or(defaults.autocomplete),
            uploads: uploads.unwrap_or(defaults.uploads),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawSettings {
    api_url: Option<String>,
    token_storage_key: Option<String>,
    map: Option<Map>,
    autocomplete: Option<Autocomplete>,
    uploads: Option<Uploads>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.api_url, "/api");
        assert_eq!(settings.token_storage_key, "token");
        assert_eq!(settings.autocomplete.debounce_ms, 500);
        assert_eq!(settings.autocomplete.min_query_len, 3);
        assert_eq!(settings.autocomplete.result_limit, 5);
        assert_eq!(settings.uploads.review_shape, UploadShape::PreUploaded);
        assert_eq!(settings.uploads.allowed_mime_types.len(), 4);
        assert!((settings.map.default_center.lat - 40.4168).abs() < f64::EPSILON);
    }

    #[test]
    fn override_single_section() {
        let settings = Settings::from_toml_str(
            r#"
            api-url = "https://cine.example.com/api"

            [uploads]
            review-shape = "bundled"
            review-folder = "r"
            movie-folder = "m"
            allowed-mime-types = ["image/png"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.api_url, "https://cine.example.com/api");
        assert_eq!(settings.uploads.review_shape, UploadShape::Bundled);
        assert_eq!(settings.token_storage_key, "token");
        assert_eq!(settings.map, Settings::default().map);
    }

    #[test]
    fn deployment_overrides() {
        let settings = Settings::with_overrides(Some("\n  token-storage-key = \"cine\"\n"));
        assert_eq!(settings.token_storage_key, "cine");
        assert_eq!(settings.api_url, "/api");
        assert_eq!(Settings::with_overrides(None), Settings::default());
        assert_eq!(Settings::with_overrides(Some("   ")), Settings::default());
        assert_eq!(Settings::with_overrides(Some("api-url = 42")), Settings::default());
    }

    #[test]
    fn reject_invalid_document() {
        assert!(Settings::from_toml_str("api-url = 42").is_err());
    }
}
