use crate::Failure;

/// What the caller has to do after a response was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEffect {
    /// The new state has been applied.
    Applied,
    /// The session is invalid.
    Logout,
    /// Show a non-blocking notification,
    /// the previous state is still in place.
    Notify(String),
    /// The response belongs to a superseded request.
    Stale,
}

/// Identifies a single load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// A collection that is loaded from the backend as a whole.
#[derive(Debug, Clone)]
pub struct Resource<T> {
    items: Vec<T>,
    generation: u64,
    loading: bool,
    loaded: bool,
    error_message: &'static str,
}

impl<T> Resource<T> {
    #[must_use]
    pub const fn new(error_message: &'static str) -> Self {
        Self {
            items: Vec::new(),
            generation: 0,
            loading: false,
            loaded: false,
            error_message,
        }
    }

    /// Start a new load.
    ///
    /// A load that is still in flight is superseded
    /// and its response will be dropped.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket(self.generation)
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Vec<T>, Failure>) -> LoadEffect {
        if ticket.0 != self.generation {
            log::debug!("Drop response of superseded load");
            return LoadEffect::Stale;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                log::debug!("Loaded {} items", items.len());
                self.items = items;
                self.loaded = true;
                LoadEffect::Applied
            }
            Err(Failure::Unauthorized) => LoadEffect::Logout,
            Err(err) => {
                log::warn!("{}: {err}", self.error_message);
                LoadEffect::Notify(err.user_message(self.error_message))
            }
        }
    }

    /// Forget everything, e.g. after a logout.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.items.clear();
        self.loading = false;
        self.loaded = false;
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }
}
