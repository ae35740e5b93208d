//! Appwrite databases REST client.
//!
//! Conversations and messages live in two collections of one database.
//! Conversation documents use the session id as document id; message
//! documents use the message id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::json;

use helpdesk_core::config::AppwriteConfig;
use helpdesk_core::types::{Conversation, Message};

use crate::error::RemoteError;
use crate::remote::RemoteStore;

/// Upper bound on messages fetched for one session.
///
/// Appwrite pages list results (25 documents by default), so the limit is
/// always sent explicitly.
pub const MESSAGE_FETCH_LIMIT: u32 = 1000;

/// Document list envelope returned by `GET .../documents`.
#[derive(Debug, Deserialize)]
struct DocumentList<T> {
    documents: Vec<T>,
}

/// Error envelope returned by Appwrite on non-2xx responses.
#[derive(Debug, Deserialize)]
struct AppwriteErrorBody {
    message: String,
}

/// REST client for the two helpdesk collections.
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    http: reqwest::Client,
    endpoint: Url,
    database_id: String,
    conversations_collection_id: String,
    messages_collection_id: String,
}

impl AppwriteClient {
    /// Build a client from configuration.
    ///
    /// Fails if the endpoint is not an http(s) base URL or the credentials
    /// cannot be sent as header values. No request is made.
    pub fn new(config: &AppwriteConfig) -> Result<Self, RemoteError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| RemoteError::InvalidEndpoint(format!("{}: {}", config.endpoint, e)))?;
        if endpoint.cannot_be_a_base() || !matches!(endpoint.scheme(), "http" | "https") {
            return Err(RemoteError::InvalidEndpoint(config.endpoint.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-appwrite-project",
            HeaderValue::from_str(&config.project_id)
                .map_err(|e| RemoteError::InvalidEndpoint(format!("project id: {}", e)))?,
        );
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| RemoteError::InvalidEndpoint(format!("api key: {}", e)))?;
        key.set_sensitive(true);
        headers.insert("x-appwrite-key", key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| RemoteError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            database_id: config.database_id.clone(),
            conversations_collection_id: config.conversations_collection_id.clone(),
            messages_collection_id: config.messages_collection_id.clone(),
        })
    }

    /// URL of a collection's documents, or of one document when `document_id`
    /// is given. Path segments are percent-encoded.
    pub fn documents_url(
        &self,
        collection_id: &str,
        document_id: Option<&str>,
    ) -> Result<Url, RemoteError> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| RemoteError::InvalidEndpoint(self.endpoint.to_string()))?;
            segments.pop_if_empty().extend([
                "databases",
                self.database_id.as_str(),
                "collections",
                collection_id,
                "documents",
            ]);
            if let Some(id) = document_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| RemoteError::Decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<AppwriteErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        Err(RemoteError::from_status(status.as_u16(), message))
    }
}

#[async_trait]
impl RemoteStore for AppwriteClient {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RemoteError> {
        let url = self.documents_url(&self.conversations_collection_id, None)?;
        let body = json!({
            "documentId": conversation.session_id,
            "data": conversation,
        });
        self.send(self.http.post(url).json(&body)).await
    }

    async fn get_conversation(&self, session_id: &str) -> Result<Conversation, RemoteError> {
        let url = self.documents_url(&self.conversations_collection_id, Some(session_id))?;
        self.send(self.http.get(url)).await
    }

    async fn touch_conversation(
        &self,
        session_id: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RemoteError> {
        let url = self.documents_url(&self.conversations_collection_id, Some(session_id))?;
        let body = json!({ "data": { "updated_at": updated_at } });
        self.send::<IgnoredAny>(self.http.patch(url).json(&body)).await?;
        Ok(())
    }

    async fn create_message(&self, message: &Message) -> Result<Message, RemoteError> {
        let url = self.documents_url(&self.messages_collection_id, None)?;
        let body = json!({
            "documentId": message.id,
            "data": message,
        });
        self.send(self.http.post(url).json(&body)).await
    }

    async fn list_messages_newest_first(
        &self,
        session_id: &str,
    ) -> Result<Vec<Message>, RemoteError> {
        let url = self.documents_url(&self.messages_collection_id, None)?;
        let queries = [
            json!({"method": "equal", "attribute": "session_id", "values": [session_id]}),
            json!({"method": "orderDesc", "attribute": "timestamp"}),
            json!({"method": "limit", "values": [MESSAGE_FETCH_LIMIT]}),
        ];
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_string()))
            .collect();

        let list: DocumentList<Message> = self.send(self.http.get(url).query(&params)).await?;
        Ok(list.documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> AppwriteConfig {
        AppwriteConfig {
            project_id: "proj".to_string(),
            api_key: "secret".to_string(),
            ..AppwriteConfig::default()
        }
    }

    #[test]
    fn test_documents_url_for_collection() {
        let client = AppwriteClient::new(&configured()).unwrap();
        let url = client.documents_url("messages", None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://cloud.appwrite.io/v1/databases/main/collections/messages/documents"
        );
    }

    #[test]
    fn test_documents_url_for_document_is_encoded() {
        let client = AppwriteClient::new(&configured()).unwrap();
        let url = client
            .documents_url("conversations", Some("a b/c"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://cloud.appwrite.io/v1/databases/main/collections/conversations/documents/a%20b%2Fc"
        );
    }

    #[test]
    fn test_documents_url_tolerates_trailing_slash() {
        let config = AppwriteConfig {
            endpoint: "http://localhost:8080/v1/".to_string(),
            ..configured()
        };
        let client = AppwriteClient::new(&config).unwrap();
        let url = client.documents_url("messages", None).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1/databases/main/collections/messages/documents"
        );
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        let config = AppwriteConfig {
            endpoint: "not a url".to_string(),
            ..configured()
        };
        assert!(matches!(
            AppwriteClient::new(&config),
            Err(RemoteError::InvalidEndpoint(_))
        ));

        let config = AppwriteConfig {
            endpoint: "mailto:ops@example.com".to_string(),
            ..configured()
        };
        assert!(matches!(
            AppwriteClient::new(&config),
            Err(RemoteError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_rejects_unsendable_api_key() {
        let config = AppwriteConfig {
            api_key: "line\nbreak".to_string(),
            ..configured()
        };
        assert!(AppwriteClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let config = AppwriteConfig {
            endpoint: "http://127.0.0.1:1/v1".to_string(),
            ..configured()
        };
        let client = AppwriteClient::new(&config).unwrap();
        let err = client.get_conversation("s-1").await.unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
        assert!(!err.is_http_error());
    }
}
