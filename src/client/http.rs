//! HTTP implementation of the backend client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use super::envelope::{self, keys};
use super::{ChampionshipBackend, ClientError};
use crate::calculate::{ScheduleInput, ValidatedResult};
use crate::config::BackendConfig;
use crate::models::{Championship, ChampionshipId, ChampionshipSummary, MatchId, Team};

/// Client for the sports-club REST backend.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("championship-desk/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: Self::normalize_base(&config.base_url)?,
        })
    }

    /// Parse the base URL and make sure relative joins keep its path.
    fn normalize_base(raw: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(raw).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Value, ClientError> {
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(url.path().to_string()));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get(&self, url: Url) -> Result<Value, ClientError> {
        self.send::<()>(Method::GET, url, None).await
    }

    /// Send a mutation and surface an explicit rejection envelope as an error.
    async fn mutate<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<(), ClientError> {
        let response = self.send(method, url, body).await?;
        envelope::unwrap_payload(response, "data")?;
        Ok(())
    }
}

#[async_trait]
impl ChampionshipBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn list_championships(&self) -> Result<Vec<ChampionshipSummary>, ClientError> {
        let body = self.get(self.endpoint("campeonatos")?).await?;
        envelope::decode(body, keys::CHAMPIONSHIPS)
    }

    async fn fetch_championship(&self, id: &ChampionshipId) -> Result<Championship, ClientError> {
        let url = self.endpoint(&format!("campeonatos/{}", id))?;
        let body = self.get(url).await?;
        let championship: Championship = envelope::decode(body, keys::CHAMPIONSHIP)?;
        info!(
            "Fetched championship {} ({} teams, {} matches)",
            championship.id,
            championship.teams.len(),
            championship.matches.len()
        );
        Ok(championship)
    }

    async fn submit_result(
        &self,
        _championship: &ChampionshipId,
        match_id: &MatchId,
        result: &ValidatedResult,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("partidos/{}/resultado", match_id))?;
        self.mutate(Method::PUT, url, Some(result)).await?;
        info!("Submitted result for match {}", match_id);
        Ok(())
    }

    async fn schedule_match(
        &self,
        _championship: &ChampionshipId,
        match_id: &MatchId,
        schedule: &ScheduleInput,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("partidos/{}/programar", match_id))?;
        self.mutate(Method::PUT, url, Some(schedule)).await?;
        info!("Scheduled match {} on {}", match_id, schedule.date);
        Ok(())
    }

    async fn request_next_round(&self, id: &ChampionshipId) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("campeonatos/{}/siguiente-ronda", id))?;
        self.mutate::<()>(Method::POST, url, None).await?;
        info!("Requested next round for championship {}", id);
        Ok(())
    }

    async fn search_teams(&self, query: &str) -> Result<Vec<Team>, ClientError> {
        let mut url = self.endpoint("equipos/buscar")?;
        url.query_pairs_mut().append_pair("q", query);
        let body = self.get(url).await?;
        envelope::decode(body, keys::TEAMS)
    }
}
