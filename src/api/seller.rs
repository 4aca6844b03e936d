use super::{ApiClient, ApiResult};
use crate::models::{Medicine, MedicineInput, Order, OrderStatus, StatusUpdate};

pub struct SellerApi<'a> {
    client: &'a ApiClient,
    token: &'a str,
}

impl<'a> SellerApi<'a> {
    pub(super) fn new(client: &'a ApiClient, token: &'a str) -> Self {
        Self { client, token }
    }

    pub async fn medicines(&self) -> ApiResult<Vec<Medicine>> {
        self.client.get("seller/medicines", Some(self.token)).await
    }

    pub async fn create_medicine(&self, input: &MedicineInput) -> ApiResult<Medicine> {
        self.client
            .post("seller/medicines", Some(self.token), input)
            .await
    }

    pub async fn update_medicine(&self, id: &str, input: &MedicineInput) -> ApiResult<Medicine> {
        self.client
            .put(&format!("seller/medicines/{}", id), Some(self.token), input)
            .await
    }

    pub async fn delete_medicine(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete(&format!("seller/medicines/{}", id), Some(self.token))
            .await
    }

    pub async fn orders(&self) -> ApiResult<Vec<Order>> {
        self.client.get("seller/orders", Some(self.token)).await
    }

    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> ApiResult<Order> {
        self.client
            .patch(
                &format!("seller/orders/{}/status", id),
                Some(self.token),
                &StatusUpdate { status },
            )
            .await
    }
}
