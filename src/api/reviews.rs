use super::{ApiClient, ApiResult};
use crate::models::{Review, ReviewInput};

pub struct ReviewsApi<'a> {
    client: &'a ApiClient,
    token: Option<&'a str>,
}

impl<'a> ReviewsApi<'a> {
    pub(super) fn new(client: &'a ApiClient, token: Option<&'a str>) -> Self {
        Self { client, token }
    }

    pub async fn for_medicine(&self, medicine_id: &str) -> ApiResult<Vec<Review>> {
        self.client
            .get(&format!("reviews/medicine/{}", medicine_id), self.token)
            .await
    }

    pub async fn create(&self, input: &ReviewInput) -> ApiResult<Review> {
        self.client.post("reviews", self.token, input).await
    }
}
