use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::ClientError;
use crate::models::{ErrorBody, ExpenseDto, ExpenseFilter, ExpenseId, ExpensePayload};

/// The expense REST API as seen by the client.
#[async_trait]
pub trait ExpenseApi: Send + Sync {
    async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<ExpenseDto>, ClientError>;
    async fn get(&self, id: ExpenseId) -> Result<ExpenseDto, ClientError>;
    async fn create(&self, payload: &ExpensePayload) -> Result<ExpenseDto, ClientError>;
    async fn update(&self, id: ExpenseId, payload: &ExpensePayload) -> Result<(), ClientError>;
    async fn delete(&self, id: ExpenseId) -> Result<(), ClientError>;
}

/// [ExpenseApi] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpExpenseApi {
    client: Client,
    base_url: String,
}

impl HttpExpenseApi {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) if body.fields.is_empty() => body.error,
            Ok(body) => body
                .fields
                .iter()
                .map(|field| format!("{}: {}", field.field, field.message))
                .collect::<Vec<_>>()
                .join(", "),
            Err(_) if text.is_empty() => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
            Err(_) => text,
        };

        tracing::debug!("API request failed with {}: {}", status, message);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        Ok(Self::check(response).await?.json().await?)
    }
}

#[async_trait]
impl ExpenseApi for HttpExpenseApi {
    async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<ExpenseDto>, ClientError> {
        let response = self
            .client
            .get(self.url("/expenses"))
            .query(filter)
            .send()
            .await?;
        Self::json(response).await
    }

    async fn get(&self, id: ExpenseId) -> Result<ExpenseDto, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/expenses/{}", id)))
            .send()
            .await?;
        Self::json(response).await
    }

    async fn create(&self, payload: &ExpensePayload) -> Result<ExpenseDto, ClientError> {
        let response = self
            .client
            .post(self.url("/expenses"))
            .json(payload)
            .send()
            .await?;
        Self::json(response).await
    }

    async fn update(&self, id: ExpenseId, payload: &ExpensePayload) -> Result<(), ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/expenses/{}", id)))
            .json(payload)
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/expenses/{}", id)))
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }
}
