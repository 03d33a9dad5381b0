use std::sync::Arc;

use crate::client::ChampionshipBackend;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn ChampionshipBackend>,
}

impl AppState {
    pub fn new(backend: Arc<dyn ChampionshipBackend>) -> Self {
        Self { backend }
    }
}
