//! Link classification client.

use std::future::Future;

use tracing::debug;

use twocat_shared::classification::{ClassifyRequest, LinkVerdict};
use twocat_shared::constants::CLASSIFY_PATH;
use twocat_shared::error::ClassificationError;

/// Anything that can judge a URL.
pub trait LinkClassifier: Send + Sync + 'static {
    fn classify(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<LinkVerdict, ClassificationError>> + Send;
}

/// Classifier reached over HTTP: `POST <base>/api/check-link` with
/// `{"url": ...}`, answered by `{"type": ..., "reason": ...}`.
#[derive(Debug, Clone)]
pub struct HttpLinkClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLinkClassifier {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        let endpoint = format!("{}{CLASSIFY_PATH}", base_url.trim_end_matches('/'));
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LinkClassifier for HttpLinkClassifier {
    async fn classify(&self, url: &str) -> Result<LinkVerdict, ClassificationError> {
        let request = ClassifyRequest {
            url: url.to_string(),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassificationError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClassificationError::Status(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| ClassificationError::Request(e.to_string()))?;
        debug!(url, bytes = body.len(), "Classifier responded");

        LinkVerdict::parse(&body)
    }
}
