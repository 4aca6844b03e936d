use super::{ApiClient, ApiResult};
use crate::models::{Category, CategoryInput, Order, OrderStatus, StatusUpdate, User, UserStatus};

pub struct AdminApi<'a> {
    client: &'a ApiClient,
    token: &'a str,
}

impl<'a> AdminApi<'a> {
    pub(super) fn new(client: &'a ApiClient, token: &'a str) -> Self {
        Self { client, token }
    }

    pub async fn users(&self) -> ApiResult<Vec<User>> {
        self.client.get("admin/users", Some(self.token)).await
    }

    pub async fn update_user_status(&self, id: &str, status: UserStatus) -> ApiResult<User> {
        self.client
            .patch(
                &format!("admin/users/{}/status", id),
                Some(self.token),
                &StatusUpdate { status },
            )
            .await
    }

    pub async fn delete_user(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete(&format!("admin/users/{}", id), Some(self.token))
            .await
    }

    pub async fn orders(&self) -> ApiResult<Vec<Order>> {
        self.client.get("admin/orders", Some(self.token)).await
    }

    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> ApiResult<Order> {
        self.client
            .patch(
                &format!("admin/orders/{}/status", id),
                Some(self.token),
                &StatusUpdate { status },
            )
            .await
    }

    pub async fn create_category(&self, input: &CategoryInput) -> ApiResult<Category> {
        self.client
            .post("admin/categories", Some(self.token), input)
            .await
    }

    pub async fn update_category(&self, id: &str, input: &CategoryInput) -> ApiResult<Category> {
        self.client
            .put(&format!("admin/categories/{}", id), Some(self.token), input)
            .await
    }

    pub async fn delete_category(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete(&format!("admin/categories/{}", id), Some(self.token))
            .await
    }
}
