use super::{ApiClient, ApiResult};
use crate::models::{Category, Medicine, MedicineQuery};

pub struct MedicinesApi<'a> {
    client: &'a ApiClient,
    token: Option<&'a str>,
}

impl<'a> MedicinesApi<'a> {
    pub(super) fn new(client: &'a ApiClient, token: Option<&'a str>) -> Self {
        Self { client, token }
    }

    pub async fn list(&self, query: &MedicineQuery) -> ApiResult<Vec<Medicine>> {
        self.client
            .get_with_query("medicines", self.token, query)
            .await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Medicine> {
        self.client
            .get(&format!("medicines/{}", id), self.token)
            .await
    }

    pub async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.client.get("categories", self.token).await
    }
}
