use super::{ApiClient, ApiResult};
use crate::models::{AuthPayload, LoginRequest, ProfileUpdate, RegisterRequest, User};

pub struct AuthApi<'a> {
    client: &'a ApiClient,
    token: Option<&'a str>,
}

impl<'a> AuthApi<'a> {
    pub(super) fn new(client: &'a ApiClient, token: Option<&'a str>) -> Self {
        Self { client, token }
    }

    pub async fn sign_in(&self, request: &LoginRequest) -> ApiResult<AuthPayload> {
        self.client.post("auth/signin", None, request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<User> {
        self.client.post("auth/signup", None, request).await
    }

    pub async fn me(&self) -> ApiResult<User> {
        self.client.get("auth/me", self.token).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<User> {
        self.client.put("auth/me", self.token, update).await
    }
}
