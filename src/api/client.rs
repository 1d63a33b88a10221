//! reqwest implementation of the book API.

use super::types::{Book, LoginResponse, SearchRecord};
use super::{ApiError, BookApi};
use async_trait::async_trait;
use reqwest::StatusCode;

/// HTTP client for the remote book service.
///
/// Endpoints mirror the service contract: `POST /api/login`,
/// `GET /api/books`, `POST /api/search`, `GET|DELETE /api/history`, all
/// parameterized through the query string. No request timeout is set; a
/// hung call leaves the affected view section in its loading state.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Format a non-success response as an `ApiError::Api`.
async fn api_error(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ApiError::Api(format!("HTTP {status}: {body}"))
}

#[async_trait]
impl BookApi for HttpApi {
    async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("/api/login"))
            .query(&[("username", username), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(api_error(response).await);
        }

        let body: LoginResponse = response.json().await?;
        Ok(body.user_id)
    }

    async fn lookup_book(&self, title: &str) -> Result<Book, ApiError> {
        let response = self
            .client
            .get(self.url("/api/books"))
            .query(&[("title", title)])
            .send()
            .await?;

        // The lookup contract is by-title-or-nothing: any non-success
        // status means the title did not resolve.
        if !response.status().is_success() {
            return Err(ApiError::NotFound);
        }

        Ok(response.json().await?)
    }

    async fn record_search(&self, title: &str, user_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/api/search"))
            .query(&[("title", title), ("user_id", user_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }

    async fn list_history(&self, user_id: &str) -> Result<Vec<SearchRecord>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/history"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response.json().await?)
    }

    async fn clear_history(&self, user_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url("/api/history"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let api = HttpApi::new("http://localhost:8000/");
        assert_eq!(api.url("/api/books"), "http://localhost:8000/api/books");
    }

    #[test]
    fn test_url_join() {
        let api = HttpApi::new("http://localhost:8000");
        assert_eq!(api.url("/api/login"), "http://localhost:8000/api/login");
    }
}
