use crate::{Failure, LoadEffect};

/// Where a click inside the overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    Content,
}

/// A details overlay for a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailModal<T> {
    Closed,
    Loading {
        id: String,
    },
    Open(T),
}

impl<T> Default for DetailModal<T> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<T> DetailModal<T> {
    /// Show the overlay and return the id that has to be fetched.
    pub fn open(&mut self, id: &str) -> String {
        log::debug!("Open details of {id}");
        *self = Self::Loading { id: id.to_string() };
        id.to_string()
    }

    pub fn loaded(&mut self, id: &str, result: Result<T, Failure>) -> LoadEffect {
        if !matches!(self, Self::Loading { id: current } if current == id) {
            log::debug!("Drop outdated details of {id}");
            return LoadEffect::Stale;
        }
        match result {
            Ok(item) => {
                *self = Self::Open(item);
                LoadEffect::Applied
            }
            Err(err) => {
                *self = Self::Closed;
                if err.is_unauthorized() {
                    return LoadEffect::Logout;
                }
                log::warn!("Unable to load details of {id}: {err}");
                LoadEffect::Notify(err.user_message("Unable to load the details"))
            }
        }
    }

    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    /// Clicks outside of the content close the overlay.
    pub fn click(&mut self, target: ClickTarget) {
        if target == ClickTarget::Backdrop {
            self.close();
        }
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    #[must_use]
    pub const fn item(&self) -> Option<&T> {
        match self {
            Self::Open(item) => Some(item),
            Self::Closed | Self::Loading { .. } => None,
        }
    }
}
