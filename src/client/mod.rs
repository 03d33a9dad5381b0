//! Backend access.
//!
//! The REST backend owns all persistence. Everything here goes through the
//! `ChampionshipBackend` trait so the API and CLI never care whether data
//! comes over HTTP or from a local snapshot file.

use async_trait::async_trait;
use thiserror::Error;

use crate::calculate::{ScheduleInput, ValidatedResult};
use crate::models::{Championship, ChampionshipId, ChampionshipSummary, MatchId, Team};

pub mod envelope;
pub mod http;
pub mod memory;
pub mod search;

pub use http::HttpBackend;
pub use memory::InMemoryBackend;
pub use search::{DebouncedSearch, SearchOutcome};

/// Errors that can occur while talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Backend rejected request: {0}")]
    Rejected(String),

    #[error("Unexpected response shape: {0}")]
    Envelope(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Operations the dashboard needs from the backend.
#[async_trait]
pub trait ChampionshipBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    async fn list_championships(&self) -> Result<Vec<ChampionshipSummary>, ClientError>;

    /// Fetch a full snapshot: championship, teams and matches.
    async fn fetch_championship(&self, id: &ChampionshipId) -> Result<Championship, ClientError>;

    /// Record a result for a match of `championship`.
    async fn submit_result(
        &self,
        championship: &ChampionshipId,
        match_id: &MatchId,
        result: &ValidatedResult,
    ) -> Result<(), ClientError>;

    async fn schedule_match(
        &self,
        championship: &ChampionshipId,
        match_id: &MatchId,
        schedule: &ScheduleInput,
    ) -> Result<(), ClientError>;

    /// Ask the backend to generate the next round from the current winners.
    async fn request_next_round(&self, id: &ChampionshipId) -> Result<(), ClientError>;

    async fn search_teams(&self, query: &str) -> Result<Vec<Team>, ClientError>;
}
