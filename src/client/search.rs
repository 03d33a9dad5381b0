//! Debounced search-as-you-type against the backend.
//!
//! Each query waits a settle delay before hitting the backend. A newer query
//! aborts the previous task, and a generation check under the publish lock
//! guarantees that once `submit` returns, no older query can publish.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::ChampionshipBackend;
use crate::models::Team;

/// Result of the most recent search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    /// The `submit` call this answers, as returned by it
    pub generation: u64,
    pub query: String,
    pub teams: Vec<Team>,
    pub error: Option<String>,
}

pub struct DebouncedSearch {
    backend: Arc<dyn ChampionshipBackend>,
    settle: Duration,
    generation: Arc<Mutex<u64>>,
    results: Arc<watch::Sender<Option<SearchOutcome>>>,
    in_flight: Option<JoinHandle<()>>,
}

impl DebouncedSearch {
    pub fn new(backend: Arc<dyn ChampionshipBackend>, settle: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            backend,
            settle,
            generation: Arc::new(Mutex::new(0)),
            results: Arc::new(tx),
            in_flight: None,
        }
    }

    /// Receiver that sees only the latest applied outcome.
    pub fn subscribe(&self) -> watch::Receiver<Option<SearchOutcome>> {
        self.results.subscribe()
    }

    fn bump_generation(&self) -> u64 {
        let mut generation = self.generation.lock().unwrap_or_else(|e| e.into_inner());
        *generation += 1;
        *generation
    }

    /// Start a search for `query`, superseding any pending one. Returns the
    /// generation its outcome will carry.
    pub fn submit(&mut self, query: impl Into<String>) -> u64 {
        let query = query.into();
        let generation = self.bump_generation();
        self.abort_in_flight();

        if query.trim().is_empty() {
            self.results.send_replace(Some(SearchOutcome {
                generation,
                query,
                ..Default::default()
            }));
            return generation;
        }

        let backend = Arc::clone(&self.backend);
        let current = Arc::clone(&self.generation);
        let results = Arc::clone(&self.results);
        let settle = self.settle;

        self.in_flight = Some(tokio::spawn(async move {
            tokio::time::sleep(settle).await;

            let outcome = match backend.search_teams(&query).await {
                Ok(teams) => SearchOutcome {
                    generation,
                    query,
                    teams,
                    error: None,
                },
                Err(e) => SearchOutcome {
                    generation,
                    query,
                    teams: Vec::new(),
                    error: Some(e.to_string()),
                },
            };

            let latest = current.lock().unwrap_or_else(|e| e.into_inner());
            if *latest != generation {
                debug!("Discarding stale search result for {:?}", outcome.query);
                return;
            }
            results.send_replace(Some(outcome));
        }));
        generation
    }

    /// Drop any pending search without publishing.
    pub fn cancel(&mut self) {
        self.bump_generation();
        self.abort_in_flight();
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}
