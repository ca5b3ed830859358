//! HTTP client for the dormitory REST backend.
//!
//! `ApiClient` is built once at startup and shared through `web::Data`.
//! Handlers turn it into a `Backend` bound to the bearer token of the current
//! session; every request made through that handle carries the
//! `Authorization` header.

mod error;

pub use error::ApiError;

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn backend(&self, token: Option<String>) -> Backend {
        Backend {
            client: self.clone(),
            token,
        }
    }
}

/// An `ApiClient` bound to one session's bearer token.
#[derive(Debug, Clone)]
pub struct Backend {
    client: ApiClient,
    token: Option<String>,
}

impl Backend {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.client.base_url, path);
        log::debug!("{method} {url}");
        let req = self.client.http.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with(path, &[]).await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let resp = self.request(Method::GET, path).query(query).send().await?;
        decode(path, resp).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, body).await
    }

    /// `POST` where the caller only needs to know the write succeeded.
    pub async fn post_ok<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let resp = self.request(Method::POST, path).json(body).send().await?;
        acknowledge(path, resp).await
    }

    pub async fn put_ok<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let resp = self.request(Method::PUT, path).json(body).send().await?;
        acknowledge(path, resp).await
    }

    pub async fn patch_ok<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let resp = self.request(Method::PATCH, path).json(body).send().await?;
        acknowledge(path, resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.request(Method::DELETE, path).send().await?;
        acknowledge(path, resp).await
    }

    pub async fn put_multipart_ok(&self, path: &str, form: multipart::Form) -> Result<(), ApiError> {
        let resp = self.request(Method::PUT, path).multipart(form).send().await?;
        acknowledge(path, resp).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.request(method, path).json(body).send().await?;
        decode(path, resp).await
    }
}

/// Turn a response into `T`, or into an `ApiError` carrying the server's
/// message. An empty success body decodes as JSON `null`.
async fn decode<T: DeserializeOwned>(path: &str, resp: Response) -> Result<T, ApiError> {
    let status = resp.status().as_u16();
    let body = resp.text().await?;
    read_body(path, status, &body)
}

/// Check a write's response. Any success body is accepted, JSON or not.
async fn acknowledge(path: &str, resp: Response) -> Result<(), ApiError> {
    let status = resp.status().as_u16();
    let body = resp.text().await?;
    read_status(path, status, &body)
}

fn read_status(path: &str, status: u16, body: &str) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let err = ApiError::from_body(status, body);
    if status >= 500 {
        log::error!("{path}: {err}");
    } else {
        log::warn!("{path}: {err}");
    }
    Err(err)
}

fn read_body<T: DeserializeOwned>(path: &str, status: u16, body: &str) -> Result<T, ApiError> {
    read_status(path, status, body)?;
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| {
        log::error!("{path}: could not decode response: {e}");
        ApiError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_accept_any_success_body() {
        assert_eq!(read_status("/api/attendance", 201, "OK"), Ok(()));
        assert_eq!(read_status("/api/attendance", 204, ""), Ok(()));
        assert_eq!(read_status("/api/rooms/1", 200, "<html>done</html>"), Ok(()));
    }

    #[test]
    fn failed_writes_carry_the_server_message() {
        let err = read_status("/api/attendance", 400, r#"{"message":"Already checked in"}"#)
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Already checked in"));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn reads_still_require_json() {
        let empty: Option<Vec<u32>> = read_body("/api/rooms", 200, "  ").unwrap();
        assert_eq!(empty, None);
        let rooms: Vec<u32> = read_body("/api/rooms", 200, "[1,2]").unwrap();
        assert_eq!(rooms, vec![1, 2]);
        assert!(matches!(
            read_body::<Vec<u32>>("/api/rooms", 200, "OK"),
            Err(ApiError::Decode(_))
        ));
    }
}
