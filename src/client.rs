//! Backend REST API Client
//!
//! reqwest implementation of [`ExpenseApi`] for native builds. The session
//! travels as the `access_token` cookie, either captured from `/login` by
//! the cookie store or replayed from a saved token.

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{endpoints, error_for_status, ExpenseApi, PieDimension};
use crate::config::ApiConfig;
use crate::error::{DashError, DashResult};
use crate::filters::{FilterState, TopN};
use crate::model::{
    ChartDataset, Decision, ExpenseRow, ExpenseStatus, FilterVocabulary, Identity, KpiSummary,
    PendingExpense,
};
use crate::session::SESSION_COOKIE;

/// Dashboard backend client
pub struct ExpenseClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl ExpenseClient {
    /// Create a new client with the given configuration
    pub fn new(config: &ApiConfig) -> DashResult<Self> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Replay a saved session token on every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(COOKIE, format!("{}={}", SESSION_COOKIE, token)),
            None => request,
        }
    }

    /// Turn a non-2xx response into the matching error
    async fn check(response: Response) -> DashResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status.as_u16(), &body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> DashResult<T> {
        tracing::debug!(path, "GET");
        let response = self.authorize(self.client.get(self.url(path))).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn post_empty(&self, path: &str) -> DashResult<()> {
        tracing::debug!(path, "POST");
        let response = self.authorize(self.client.post(self.url(path))).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Log in and return the session token set by the backend
    pub async fn login(&mut self, email: &str, password: &str) -> DashResult<String> {
        let response = self
            .client
            .post(self.url(endpoints::LOGIN))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let response = Self::check(response).await?;

        let token = response
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| DashError::Decode("login response carried no session cookie".into()))?;

        tracing::info!(email, "Logged in");
        self.token = Some(token.clone());
        Ok(token)
    }
}

#[async_trait(?Send)]
impl ExpenseApi for ExpenseClient {
    async fn me(&self) -> DashResult<Identity> {
        self.get_json(endpoints::ME).await
    }

    async fn kpis(&self, filters: &FilterState) -> DashResult<KpiSummary> {
        self.get_json(&endpoints::kpis(filters)).await
    }

    async fn expenses(&self, status: ExpenseStatus) -> DashResult<Vec<ExpenseRow>> {
        self.get_json(&endpoints::expenses(status)).await
    }

    async fn admin_filters(&self) -> DashResult<FilterVocabulary> {
        self.get_json(endpoints::ADMIN_FILTERS).await
    }

    async fn pie(
        &self,
        dimension: PieDimension,
        filters: &FilterState,
        top: Option<TopN>,
    ) -> DashResult<ChartDataset> {
        self.get_json(&endpoints::pie(dimension, filters, top)).await
    }

    async fn pending_expenses(&self) -> DashResult<Vec<PendingExpense>> {
        self.get_json(endpoints::PENDING_EXPENSES).await
    }

    async fn decide(&self, pending_id: i64, decision: Decision) -> DashResult<()> {
        self.post_empty(&endpoints::decision(pending_id, decision)).await
    }
}
