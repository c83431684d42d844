//! HTTP API Client
//!
//! gloo-net implementation of [`ExpenseApi`]. Every request carries the
//! session cookie (`credentials: include`).

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use web_sys::RequestCredentials;

use expense_dash::{
    endpoints, error_for_status, ChartDataset, DashError, DashResult, Decision, ExpenseApi,
    ExpenseRow, ExpenseStatus, FilterState, FilterVocabulary, Identity, KpiSummary,
    PendingExpense, PieDimension, TopN,
};

/// Same origin as the page
pub const DEFAULT_API_BASE: &str = "";

const API_URL_KEY: &str = "expense_dash_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let stored = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(API_URL_KEY).ok().flatten());

    normalize_base(stored.as_deref().unwrap_or(DEFAULT_API_BASE))
}

fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Browser fetch client
#[derive(Debug, Clone)]
pub struct HttpApi {
    base: String,
}

impl Default for HttpApi {
    fn default() -> Self {
        Self::new(get_api_base())
    }
}

impl HttpApi {
    pub fn new(base: impl AsRef<str>) -> Self {
        Self { base: normalize_base(base.as_ref()) }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn check(response: Response) -> DashResult<Response> {
        if response.ok() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, &body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> DashResult<T> {
        let response = Request::get(&self.url(path))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(|e| DashError::Transport(e.to_string()))?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| DashError::Decode(e.to_string()))
    }

    async fn post_empty(&self, path: &str) -> DashResult<()> {
        let response = Request::post(&self.url(path))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(|e| DashError::Transport(e.to_string()))?;

        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl ExpenseApi for HttpApi {
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


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_api_base_read_from_storage() {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .expect("local storage");
        storage.set_item(API_URL_KEY, "http://api.example.com/").unwrap();
        assert_eq!(get_api_base(), "http://api.example.com");
        storage.remove_item(API_URL_KEY).unwrap();
    }
}
