/// HTTP transport against the kanban API
///
/// Authenticates with a bearer token, either given up front or obtained by
/// [`HttpTransport::login`].

use super::transport_trait::{BoardTransport, ClientError, ClientResult};
use crate::board::BoardSnapshot;
use async_trait::async_trait;
use futures::future::join_all;
use kanban_shared::models::{
    card::{Card, UpdateCard},
    list::{List, UpdateList},
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct LoginBody {
    token: String,
}

impl HttpTransport {
    /// Transport without credentials; `base_url` is the server root
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Logs in and keeps the returned session token
    pub async fn login(base_url: &str, email: &str, password: &str) -> ClientResult<Self> {
        let transport = Self::new(base_url);

        let response = transport
            .request(Method::POST, "/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(network)?;
        let body: LoginBody = decode(response).await?;

        Ok(transport.with_token(body.token))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(network)?;
        decode(response).await
    }
}

fn network(err: reqwest::Error) -> ClientError {
    ClientError::Network(err.to_string())
}

/// Turns a response into `T`, or into `ClientError::Status` for non-2xx
async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();

    if !status.is_success() {
        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let message = body["message"]
            .as_str()
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed"))
            .to_string();

        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait]
impl BoardTransport for HttpTransport {
    async fn load_board(&self, board_id: i32) -> ClientResult<BoardSnapshot> {
        let lists: Vec<List> = self.get(&format!("/api/boards/{}/lists", board_id)).await?;

        let card_pages = join_all(lists.iter().map(|list| {
            let path = format!("/api/lists/{}/cards", list.id);
            async move { self.get::<Vec<Card>>(&path).await }
        }))
        .await;

        let mut cards = Vec::new();
        for page in card_pages {
            cards.extend(page?);
        }

        Ok(BoardSnapshot::new(board_id, lists, cards))
    }

    async fn update_card(&self, card_id: i32, update: &UpdateCard) -> ClientResult<Card> {
        let response = self
            .request(Method::PATCH, &format!("/api/cards/{}", card_id))
            .json(update)
            .send()
            .await
            .map_err(network)?;
        decode(response).await
    }

    async fn update_list(&self, list_id: i32, update: &UpdateList) -> ClientResult<List> {
        let response = self
            .request(Method::PATCH, &format!("/api/lists/{}", list_id))
            .json(update)
            .send()
            .await
            .map_err(network)?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let transport = HttpTransport::new("http://localhost:8080/");
        assert_eq!(transport.base_url, "http://localhost:8080");
        assert!(transport.token.is_none());

        let transport = transport.with_token("abc");
        assert_eq!(transport.token.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let transport = HttpTransport::new("http://127.0.0.1:1");

        let err = transport
            .update_card(5, &UpdateCard::placement(2, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
