use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use log::debug;

use crate::error::{Result, ScraperError};

const REALTIME_ENDPOINT: &str = "https://realtime.oxylabs.io/v1/queries";

/// One paginated search request. The fixed result-shaping options are
/// supplied by the client, not the caller.
#[derive(Debug, Clone)]
pub struct SerpRequest {
    pub query: String,
    pub start_page: u32,
    pub pages: u32,
}

/// Top level of a realtime API response. A payload without `results`
/// fails deserialization, which aborts the harvest.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<PageResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageResult {
    #[serde(default)]
    pub content: PageContent,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageContent {
    #[serde(default)]
    pub results: ResultBlock,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResultBlock {
    #[serde(default)]
    pub organic: Vec<OrganicResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub url: Option<String>,
}

pub trait SearchApi {
    fn run_query(&self, request: &SerpRequest) -> Result<QueryResponse>;
}

pub struct OxylabsClient {
    client: Client,
    username: String,
    password: String,
}

impl OxylabsClient {
    pub fn new(username: &str, password: &str) -> Self {
        let client = Client::builder()
            // The realtime endpoint holds the connection open until every
            // requested page has rendered.
            .timeout(Duration::from_secs(180))
            .build()
            .expect("Failed to build SERP client");

        OxylabsClient {
            client,
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn build_payload(request: &SerpRequest) -> serde_json::Value {
        json!({
            "source": "google_search",
            "user_agent_type": "desktop_chrome",
            "parse": true,
            "locale": "en-us",
            "limit": 100,
            "query": request.query,
            "start_page": request.start_page,
            "pages": request.pages,
            "context": [
                { "key": "filter", "value": 1 },
                { "key": "nfpr", "value": true },
                { "key": "results_language", "value": "en" },
            ],
        })
    }
}

impl SearchApi for OxylabsClient {
    fn run_query(&self, request: &SerpRequest) -> Result<QueryResponse> {
        debug!(
            "POST {} start_page={} pages={}",
            REALTIME_ENDPOINT, request.start_page, request.pages
        );

        let response = self
            .client
            .post(REALTIME_ENDPOINT)
            .basic_auth(&self.username, Some(&self.password))
            .json(&Self::build_payload(request))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ScraperError::BadResponse {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json()?)
    }
}
