//! Debounced address autocomplete.
//!
//! ```text
//! Idle --(input >= 3 chars)--> Debouncing --(quiet period)--> Querying --> Idle
//! ```
//!
//! Every keystroke starts a new generation.
//! Timers and responses of older generations are ignored.

use crate::{
    bbox::is_valid_coordinate,
    boundary::{Coordinate, GeocodingSuggestion},
    config, Failure,
};

/// The hidden latitude/longitude inputs of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinateFields {
    pub lat: String,
    pub lng: String,
}

impl CoordinateFields {
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        let lat = self.lat.trim().parse().ok()?;
        let lng = self.lng.trim().parse().ok()?;
        let c = Coordinate { lat, lng };
        is_valid_coordinate(c).then_some(c)
    }

    #[must_use]
    pub fn from_coordinate(c: Coordinate) -> Self {
        Self {
            lat: format!("{:.6}", c.lat),
            lng: format!("{:.6}", c.lng),
        }
    }

    pub fn clear(&mut self) {
        self.lat.clear();
        self.lng.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Debouncing { generation: u64 },
    Querying { generation: u64 },
}

/// What the frontend has to do after an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Cancel the pending timer and request (if any)
    /// and hide the suggestions.
    Clear,
    /// Cancel the pending timer and request (if any)
    /// and start a new timer.
    Schedule { generation: u64, delay_ms: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub generation: u64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct AddressAutocomplete {
    settings: config::Autocomplete,
    text: String,
    generation: u64,
    phase: Phase,
    suggestions: Vec<GeocodingSuggestion>,
    fields: CoordinateFields,
    preview: Option<Coordinate>,
}

impl AddressAutocomplete {
    #[must_use]
    pub const fn new(settings: config::Autocomplete) -> Self {
        Self {
            settings,
            text: String::new(),
            generation: 0,
            phase: Phase::Idle,
            suggestions: Vec::new(),
            fields: CoordinateFields {
                lat: String::new(),
                lng: String::new(),
            },
            preview: None,
        }
    }

    pub fn input(&mut self, text: &str) -> Command {
        self.text = text.to_string();
        self.generation += 1;
        self.suggestions.clear();
        if text.trim().chars().count() < self.settings.min_query_len {
            self.phase = Phase::Idle;
            return Command::Clear;
        }
        self.phase = Phase::Debouncing {
            generation: self.generation,
        };
        Command::Schedule {
            generation: self.generation,
            delay_ms: self.settings.debounce_ms,
        }
    }

    /// The timer of the given generation fired.
    pub fn debounce_elapsed(&mut self, generation: u64) -> Option<Query> {
        if self.phase != (Phase::Debouncing { generation }) {
            log::debug!("Ignore outdated debounce timer {generation}");
            return None;
        }
        self.phase = Phase::Querying { generation };
        Some(Query {
            generation,
            text: self.text.trim().to_string(),
        })
    }

    /// Returns `true` if the suggestions have changed.
    pub fn suggestions_received(
        &mut self,
        generation: u64,
        result: Result<Vec<GeocodingSuggestion>, Failure>,
    ) -> bool {
        if self.phase != (Phase::Querying { generation }) {
            log::debug!("Drop suggestions of outdated query {generation}");
            return false;
        }
        self.phase = Phase::Idle;
        match result {
            Ok(mut suggestions) => {
                suggestions.truncate(self.settings.result_limit.into());
                self.suggestions = suggestions;
            }
            Err(err) => {
                log::warn!("Unable to fetch address suggestions: {err}");
                self.suggestions.clear();
            }
        }
        true
    }

    /// Apply the selected suggestion.
    ///
    /// Returns the center of the preview map.
    pub fn select(&mut self, index: usize) -> Option<Coordinate> {
        let suggestion = self.suggestions.get(index)?;
        let lat = suggestion.lat.trim().parse().ok();
        let lng = suggestion.lon.trim().parse().ok();
        let Some(center) = lat
            .zip(lng)
            .map(|(lat, lng)| Coordinate { lat, lng })
            .filter(|c| is_valid_coordinate(*c))
        else {
            log::warn!("Invalid coordinates of '{}'", suggestion.display_name);
            return None;
        };
        self.fields = CoordinateFields {
            lat: suggestion.lat.clone(),
            lng: suggestion.lon.clone(),
        };
        self.text = suggestion.display_name.clone();
        self.generation += 1;
        self.phase = Phase::Idle;
        self.suggestions.clear();
        self.preview = Some(center);
        Some(center)
    }

    pub fn marker_dragged(&mut self, position: Coordinate) {
        self.fields = CoordinateFields::from_coordinate(position);
        self.preview = Some(position);
    }

    pub fn set_lat(&mut self, lat: &str) {
        self.fields.lat = lat.to_string();
        self.sync_preview();
    }

    pub fn set_lng(&mut self, lng: &str) {
        self.fields.lng = lng.to_string();
        self.sync_preview();
    }

    /// Close the suggestions without selecting one.
    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.suggestions.clear();
    }

    /// Reset everything after a successful submission.
    pub fn reset(&mut self) {
        self.dismiss();
        self.text.clear();
        self.fields.clear();
        self.preview = None;
    }

    fn sync_preview(&mut self) {
        if let Some(c) = self.fields.coordinate() {
            self.preview = Some(c);
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn suggestions(&self) -> &[GeocodingSuggestion] {
        &self.suggestions
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.suggestions.is_empty()
    }

    #[must_use]
    pub const fn fields(&self) -> &CoordinateFields {
        &self.fields
    }

    /// The position of the draggable marker, if any.
    #[must_use]
    pub const fn preview(&self) -> Option<Coordinate> {
        self.preview
    }
}
