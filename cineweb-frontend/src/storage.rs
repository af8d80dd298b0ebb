use gloo_storage::{LocalStorage, Storage};

use cineweb_core::TokenStore;

/// Session token in the browser's local storage.
#[derive(Debug, Clone)]
pub struct LocalTokenStore {
    key: String,
}

impl LocalTokenStore {
    pub const fn new(key: String) -> Self {
        Self { key }
    }
}

impl TokenStore for LocalTokenStore {
    fn load(&self) -> Option<String> {
        LocalStorage::get(&self.key).ok()
    }
    fn save(&self, token: &str) {
        if let Err(err) = LocalStorage::set(&self.key, token) {
            log::warn!("Unable to store token: {err}");
        }
    }
    fn delete(&self) {
        LocalStorage::delete(&self.key);
    }
}
