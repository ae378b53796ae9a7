//! Shared handle for hosts that call the store from several threads.

use std::sync::{Arc, Mutex};

use crate::db::FlashcardStore;

/// Application-wide store handle, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<FlashcardStore>>,
}

impl AppState {
    pub fn new(store: FlashcardStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}
