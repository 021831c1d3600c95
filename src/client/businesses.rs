use reqwest::Method;
use serde_json::to_value;

use super::{extract, YamClient};
use crate::error::ApiError;
use crate::models::{Business, BusinessUpdate, NewBusiness};

impl YamClient {
    pub async fn create_business(
        &self,
        user_id: i64,
        data: &NewBusiness,
    ) -> Result<Business, ApiError> {
        let body = self
            .send(
                Method::POST,
                &format!("users/{}/businesses", user_id),
                Some(&to_value(data)?),
            )
            .await?;
        extract(body, "business")
    }

    pub async fn get_all_businesses(&self, user_id: i64) -> Result<Vec<Business>, ApiError> {
        let body = self
            .send(Method::GET, &format!("users/{}/businesses", user_id), None)
            .await?;
        extract(body, "businesses")
    }

    pub async fn get_business(&self, user_id: i64, business_id: i64) -> Result<Business, ApiError> {
        let body = self
            .send(
                Method::GET,
                &format!("users/{}/businesses/{}", user_id, business_id),
                None,
            )
            .await?;
        extract(body, "business")
    }

    pub async fn update_business(
        &self,
        user_id: i64,
        business_id: i64,
        update: &BusinessUpdate,
    ) -> Result<Business, ApiError> {
        let body = self
            .send(
                Method::PATCH,
                &format!("users/{}/businesses/{}", user_id, business_id),
                Some(&to_value(update)?),
            )
            .await?;
        extract(body, "business")
    }

    pub async fn delete_business(&self, user_id: i64, business_id: i64) -> Result<(), ApiError> {
        self.send(
            Method::DELETE,
            &format!("users/{}/businesses/{}", user_id, business_id),
            None,
        )
        .await?;
        Ok(())
    }
}
