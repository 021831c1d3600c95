use reqwest::Method;
use serde_json::to_value;

use super::{extract, YamClient};
use crate::error::ApiError;
use crate::models::{NewProduct, Product, ProductUpdate};

impl YamClient {
    pub async fn create_product(
        &self,
        user_id: i64,
        data: &NewProduct,
    ) -> Result<Product, ApiError> {
        let body = self
            .send(
                Method::POST,
                &format!("users/{}/products", user_id),
                Some(&to_value(data)?),
            )
            .await?;
        extract(body, "product")
    }

    pub async fn get_all_products(&self, user_id: i64) -> Result<Vec<Product>, ApiError> {
        let body = self
            .send(Method::GET, &format!("users/{}/products", user_id), None)
            .await?;
        extract(body, "products")
    }

    pub async fn get_product(&self, user_id: i64, product_id: i64) -> Result<Product, ApiError> {
        let body = self
            .send(
                Method::GET,
                &format!("users/{}/products/{}", user_id, product_id),
                None,
            )
            .await?;
        extract(body, "product")
    }

    pub async fn update_product(
        &self,
        user_id: i64,
        product_id: i64,
        update: &ProductUpdate,
    ) -> Result<Product, ApiError> {
        let body = self
            .send(
                Method::PATCH,
                &format!("users/{}/products/{}", user_id, product_id),
                Some(&to_value(update)?),
            )
            .await?;
        extract(body, "product")
    }

    pub async fn delete_product(&self, user_id: i64, product_id: i64) -> Result<(), ApiError> {
        self.send(
            Method::DELETE,
            &format!("users/{}/products/{}", user_id, product_id),
            None,
        )
        .await?;
        Ok(())
    }
}
