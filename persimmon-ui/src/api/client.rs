//! HTTP API Client
//!
//! Functions for communicating with the Persimmon REST API.

use gloo_net::http::{Request, Response};

use crate::state::global::{DashboardView, Selection, SelectionOptions};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8082/api/v1";

/// Local storage key overriding the API base URL
const API_URL_KEY: &str = "persimmon_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    url.trim_end_matches('/').to_string()
}

// ============ Response Types ============

#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
    #[serde(default)]
    request_id: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorDetail {
    code: String,
    message: String,
}

/// A failed request, as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    /// Stable error code from the API, or `NETWORK_ERROR` / `PARSE_ERROR`
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

impl ApiFailure {
    fn network(err: impl std::fmt::Display) -> Self {
        Self {
            code: "NETWORK_ERROR".to_string(),
            message: format!("Network error: {}", err),
            request_id: None,
        }
    }

    fn parse(err: impl std::fmt::Display) -> Self {
        Self {
            code: "PARSE_ERROR".to_string(),
            message: format!("Parse error: {}", err),
            request_id: None,
        }
    }
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

// ============ API Functions ============

/// Query string for a dashboard request; `+` in `65+` must be escaped
pub fn dashboard_query(selection: &Selection) -> String {
    format!(
        "state={}&age_group={}&elective={}",
        urlencoding::encode(&selection.state),
        urlencoding::encode(&selection.age_group),
        urlencoding::encode(&selection.elective)
    )
}

/// Fetch the chooser option sets
pub async fn fetch_options() -> Result<SelectionOptions, ApiFailure> {
    let api_base = get_api_base();

    let response = Request::get(&format!("{}/options", api_base))
        .send()
        .await
        .map_err(ApiFailure::network)?;

    read_json(response).await
}

/// Fetch the composed dashboard view for a selection
pub async fn fetch_dashboard(selection: &Selection) -> Result<DashboardView, ApiFailure> {
    let api_base = get_api_base();

    let response = Request::get(&format!("{}/dashboard?{}", api_base, dashboard_query(selection)))
        .send()
        .await
        .map_err(ApiFailure::network)?;

    read_json(response).await
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiFailure> {
    if !response.ok() {
        let status = response.status();
        return Err(match response.json::<ApiErrorBody>().await {
            Ok(body) => ApiFailure {
                code: body.error.code,
                message: body.error.message,
                request_id: body.request_id,
            },
            Err(_) => ApiFailure {
                code: "UNKNOWN_ERROR".to_string(),
                message: format!("Request failed with status {}", status),
                request_id: None,
            },
        });
    }

    response.json().await.map_err(ApiFailure::parse)
}
