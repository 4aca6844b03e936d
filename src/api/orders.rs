use reqwest::Method;

use super::{ApiClient, ApiResult};
use crate::models::{CreateOrderRequest, Order};

pub struct OrdersApi<'a> {
    client: &'a ApiClient,
    token: &'a str,
}

impl<'a> OrdersApi<'a> {
    pub(super) fn new(client: &'a ApiClient, token: &'a str) -> Self {
        Self { client, token }
    }

    pub async fn create(&self, request: &CreateOrderRequest) -> ApiResult<Order> {
        self.client.post("orders", Some(self.token), request).await
    }

    pub async fn list(&self) -> ApiResult<Vec<Order>> {
        self.client.get("orders", Some(self.token)).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Order> {
        self.client
            .get(&format!("orders/{}", id), Some(self.token))
            .await
    }

    pub async fn cancel(&self, id: &str) -> ApiResult<Order> {
        self.client
            .send::<Order, (), ()>(
                Method::PATCH,
                &format!("orders/{}/cancel", id),
                Some(self.token),
                None,
                None,
            )
            .await
    }
}
