//! HTTP implementation of the collaborator contracts.

use super::convert::{DepositDto, DepositStatusDto, ErrorBodyDto, GameDto};
use super::{DepositApi, PredictionApi, PredictionSubmission, SubmissionReceipt, WireConverter};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::state::{DepositDescriptor, DepositRequest, DepositState, Game};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Builder for creating an API client.
pub struct HttpApiClientBuilder {
    config: ApiConfig,
}

impl HttpApiClientBuilder {
    /// Create a new builder with default config.
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
        }
    }

    /// Set the API configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the session token sent with authenticated requests.
    pub fn session_token(mut self, token: impl Into<String>) -> Self {
        self.config.session_token = Some(token.into());
        self
    }

    /// Build the API client.
    pub fn build(self) -> Result<HttpApiClient> {
        HttpApiClient::new(self.config)
    }
}

impl Default for HttpApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON-over-HTTP client for the game and deposit collaborators.
///
/// All network settings come from the injected [`ApiConfig`]; there is no
/// process-wide default to mutate.
pub struct HttpApiClient {
    config: ApiConfig,
    http: reqwest::Client,
}

impl HttpApiClient {
    /// Create a new API client.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.session_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Map a non-success response to an error, reading a structured body
    /// when the server supplies one.
    async fn error_from_response(response: reqwest::Response) -> Error {
        let status = response.status();
        if status.is_client_error() {
            let body = response.json::<ErrorBodyDto>().await.unwrap_or_default();
            if let Some(message) = WireConverter::rejection_message(body) {
                return Error::rejected(message);
            }
        }
        Error::network(format!("request failed with status {status}"))
    }
}

#[async_trait]
impl PredictionApi for HttpApiClient {
    async fn fetch_open_games(&self) -> Result<Vec<Game>> {
        let response = self
            .request(self.http.get(self.url("games/open")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        let games: Vec<GameDto> = response.json().await?;
        Ok(games.into_iter().map(WireConverter::convert_game).collect())
    }

    async fn submit_prediction(
        &self,
        submission: &PredictionSubmission,
    ) -> Result<SubmissionReceipt> {
        let response = self
            .request(self.http.post(self.url("predictions")))
            .json(submission)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(response.json::<SubmissionReceipt>().await?)
    }
}

#[async_trait]
impl DepositApi for HttpApiClient {
    async fn initiate_deposit(&self, request: &DepositRequest) -> Result<DepositDescriptor> {
        let response = self
            .request(self.http.post(self.url("deposits")))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        let dto: DepositDto = response.json().await?;
        Ok(WireConverter::convert_descriptor(dto))
    }

    async fn deposit_status(&self, deposit_id: &str) -> Result<DepositState> {
        let response = self
            .request(
                self.http
                    .get(self.url(&format!("deposits/{deposit_id}/status"))),
            )
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::invalid_input(format!(
                "unknown deposit '{deposit_id}'"
            )));
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(response.json::<DepositStatusDto>().await?.status)
    }
}
