//! HTTP client helpers for tests.

use std::time::Duration;

use extractqa::constants::STATUS_HEADER;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

/// Status code, `x-extractqa-status` header, and body of one response.
pub struct TestResponse<T> {
    pub status: u16,
    pub status_header: String,
    pub body: T,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    fn status_header(resp: &reqwest::Response) -> String {
        resp.headers()
            .get(STATUS_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string()
    }

    pub async fn answer(
        &self,
        context: &str,
        question: &str,
    ) -> Result<TestResponse<serde_json::Value>, reqwest::Error> {
        let resp = self
            .client
            .post(self.url("/v1/answer"))
            .json(&serde_json::json!({"context": context, "question": question}))
            .send()
            .await?;
        Self::json_response(resp).await
    }

    pub async fn submit_form(
        &self,
        context: &str,
        question: &str,
    ) -> Result<TestResponse<String>, reqwest::Error> {
        let resp = self
            .client
            .post(self.url("/"))
            .form(&[("context", context), ("question", question)])
            .send()
            .await?;

        let status = resp.status().as_u16();
        let status_header = Self::status_header(&resp);
        let body = resp.text().await?;
        Ok(TestResponse {
            status,
            status_header,
            body,
        })
    }

    pub async fn get_json(
        &self,
        path: &str,
    ) -> Result<TestResponse<serde_json::Value>, reqwest::Error> {
        let resp = self.client.get(self.url(path)).send().await?;
        Self::json_response(resp).await
    }

    async fn json_response(
        resp: reqwest::Response,
    ) -> Result<TestResponse<serde_json::Value>, reqwest::Error> {
        let status = resp.status().as_u16();
        let status_header = Self::status_header(&resp);
        let body = resp.json().await?;
        Ok(TestResponse {
            status,
            status_header,
            body,
        })
    }
}
