use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::types::{KnowledgeDocument, KnowledgeError};

/// Boundary to the external knowledge source
#[async_trait]
pub trait KnowledgeService: Send + Sync {
    /// Cheap handshake; gates the topic fan-out
    async fn probe(&self) -> Result<(), KnowledgeError>;

    async fn query(
        &self,
        text: &str,
        limit: usize,
        category: &str,
    ) -> Result<Vec<KnowledgeDocument>, KnowledgeError>;
}

/// HTTP adapter: `GET {base}/health` and `POST {base}/search`
pub struct HttpKnowledgeService {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    limit: usize,
    category: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<KnowledgeDocument>,
}

impl HttpKnowledgeService {
    pub fn new(base_url: &str) -> Result<Self, KnowledgeError> {
        let client = Client::builder()
            .build()
            .map_err(|e| KnowledgeError::Unreachable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl KnowledgeService for HttpKnowledgeService {
    async fn probe(&self) -> Result<(), KnowledgeError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| KnowledgeError::Unreachable(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(KnowledgeError::Status {
                status: response.status().as_u16(),
            })
        }
    }

    async fn query(
        &self,
        text: &str,
        limit: usize,
        category: &str,
    ) -> Result<Vec<KnowledgeDocument>, KnowledgeError> {
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&SearchRequest {
                query: text,
                limit,
                category,
            })
            .send()
            .await
            .map_err(|e| KnowledgeError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(KnowledgeError::Status {
                status: response.status().as_u16(),
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| KnowledgeError::Malformed(e.to_string()))?;
        Ok(parsed.results.into_iter().take(limit).collect())
    }
}
