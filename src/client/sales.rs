use reqwest::Method;
use serde_json::to_value;

use super::{extract, YamClient};
use crate::error::ApiError;
use crate::models::{NewSale, Sale, SaleUpdate};

impl YamClient {
    pub async fn create_sale(&self, product_id: i64, data: &NewSale) -> Result<Sale, ApiError> {
        let body = self
            .send(
                Method::POST,
                &format!("products/{}/sales", product_id),
                Some(&to_value(data)?),
            )
            .await?;
        extract(body, "sale")
    }

    pub async fn get_all_sales(&self, product_id: i64) -> Result<Vec<Sale>, ApiError> {
        let body = self
            .send(Method::GET, &format!("products/{}/sales", product_id), None)
            .await?;
        extract(body, "sales")
    }

    pub async fn get_sale(&self, product_id: i64, sale_id: i64) -> Result<Sale, ApiError> {
        let body = self
            .send(
                Method::GET,
                &format!("products/{}/sales/{}", product_id, sale_id),
                None,
            )
            .await?;
        extract(body, "sale")
    }

    pub async fn update_sale(
        &self,
        product_id: i64,
        sale_id: i64,
        update: &SaleUpdate,
    ) -> Result<Sale, ApiError> {
        let body = self
            .send(
                Method::PATCH,
                &format!("products/{}/sales/{}", product_id, sale_id),
                Some(&to_value(update)?),
            )
            .await?;
        extract(body, "sale")
    }

    pub async fn delete_sale(&self, product_id: i64, sale_id: i64) -> Result<(), ApiError> {
        self.send(
            Method::DELETE,
            &format!("products/{}/sales/{}", product_id, sale_id),
            None,
        )
        .await?;
        Ok(())
    }
}
