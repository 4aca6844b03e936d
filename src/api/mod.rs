//! HTTP client for the MediStore REST API.
//!
//! Every call issues exactly one request. Successful responses carry their
//! payload under `data`; failures carry a human readable `message`.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

mod admin;
mod auth;
mod medicines;
mod orders;
mod reviews;
mod seller;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use medicines::MedicinesApi;
pub use orders::OrdersApi;
pub use reviews::ReviewsApi;
pub use seller::SellerApi;

pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Could not reach MediStore: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Authentication required")]
    Unauthorized,
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("The server response carried no data")]
    MissingData,
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client for the API rooted at `base_url`
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the versioned API, e.g. "http://localhost:5000/api/v1".
    ///   A trailing slash is ignored
    /// * `timeout` - Limit for each request, from connect to the last byte of the body
    ///
    /// # Returns
    ///
    /// The client, or `ApiError::Network` if the TLS backend cannot be set up
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth<'a>(&'a self, token: Option<&'a str>) -> AuthApi<'a> {
        AuthApi::new(self, token)
    }

    pub fn medicines<'a>(&'a self, token: Option<&'a str>) -> MedicinesApi<'a> {
        MedicinesApi::new(self, token)
    }

    pub fn orders<'a>(&'a self, token: &'a str) -> OrdersApi<'a> {
        OrdersApi::new(self, token)
    }

    pub fn seller<'a>(&'a self, token: &'a str) -> SellerApi<'a> {
        SellerApi::new(self, token)
    }

    pub fn admin<'a>(&'a self, token: &'a str) -> AdminApi<'a> {
        AdminApi::new(self, token)
    }

    pub fn reviews<'a>(&'a self, token: Option<&'a str>) -> ReviewsApi<'a> {
        ReviewsApi::new(self, token)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ApiResult<T> {
        self.send::<T, (), ()>(Method::GET, path, token, None, None)
            .await
    }

    pub(crate) async fn get_with_query<T, Q>(
        &self,
        path: &str,
        token: Option<&str>,
        query: &Q,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send::<T, (), Q>(Method::GET, path, token, Some(query), None)
            .await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, token: Option<&str>, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send::<T, B, ()>(Method::POST, path, token, None, Some(body))
            .await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, token: Option<&str>, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send::<T, B, ()>(Method::PUT, path, token, None, Some(body))
            .await
    }

    pub(crate) async fn patch<T, B>(&self, path: &str, token: Option<&str>, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send::<T, B, ()>(Method::PATCH, path, token, None, Some(body))
            .await
    }

    pub(crate) async fn delete(&self, path: &str, token: Option<&str>) -> ApiResult<()> {
        self.send_unit::<()>(Method::DELETE, path, token, None).await
    }

    /// Sends one request and decodes the `data` field of the reply
    ///
    /// # Arguments
    ///
    /// * `path` - Endpoint relative to the base URL
    /// * `token` - Bearer token, for endpoints that need a signed-in user
    /// * `query` - Serialized into the query string when present
    /// * `body` - Serialized as the JSON body when present
    ///
    /// # Returns
    ///
    /// The payload under `data`. A 401 becomes `ApiError::Unauthorized`, any
    /// other failure `ApiError::Rejected` with the server's message or
    /// [`FALLBACK_MESSAGE`]
    pub(crate) async fn send<T, B, Q>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        let text = self.execute(method, path, token, query, body).await?;
        let envelope: Envelope<T> = serde_json::from_str(&text)?;
        envelope.data.ok_or(ApiError::MissingData)
    }

    /// Sends one request whose reply payload is not needed.
    pub(crate) async fn send_unit<B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute::<B, ()>(method, path, token, None, body)
            .await
            .map(|_| ())
    }

    async fn execute<B, Q>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> ApiResult<String>
    where
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let request_id = Uuid::new_v4();
        log::debug!("{} {} [{}]", method, path, request_id);

        let mut request = self
            .http
            .request(method, &url)
            .header("X-Request-Id", request_id.to_string());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(text);
        }
        if status == StatusCode::UNAUTHORIZED {
            log::warn!("{} answered 401 [{}]", path, request_id);
            return Err(ApiError::Unauthorized);
        }
        Err(rejection(status, &text))
    }
}

fn rejection(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
    ApiError::Rejected {
        status: status.as_u16(),
        message,
    }
}
