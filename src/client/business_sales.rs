use reqwest::Method;
use serde_json::to_value;

use super::{extract, YamClient};
use crate::error::ApiError;
use crate::models::{BusinessSale, BusinessSaleUpdate, NewBusinessSale};

impl YamClient {
    pub async fn create_business_sale(
        &self,
        business_id: i64,
        data: &NewBusinessSale,
    ) -> Result<BusinessSale, ApiError> {
        let body = self
            .send(
                Method::POST,
                &format!("businesses/{}/businessSales", business_id),
                Some(&to_value(data)?),
            )
            .await?;
        extract(body, "businessSale")
    }

    pub async fn get_all_business_sales(
        &self,
        business_id: i64,
    ) -> Result<Vec<BusinessSale>, ApiError> {
        let body = self
            .send(
                Method::GET,
                &format!("businesses/{}/businessSales", business_id),
                None,
            )
            .await?;
        extract(body, "businessSales")
    }

    pub async fn get_business_sale(
        &self,
        business_id: i64,
        business_sale_id: i64,
    ) -> Result<BusinessSale, ApiError> {
        let body = self
            .send(
                Method::GET,
                &format!("businesses/{}/businessSales/{}", business_id, business_sale_id),
                None,
            )
            .await?;
        extract(body, "businessSale")
    }

    pub async fn update_business_sale(
        &self,
        business_id: i64,
        business_sale_id: i64,
        update: &BusinessSaleUpdate,
    ) -> Result<BusinessSale, ApiError> {
        let body = self
            .send(
                Method::PATCH,
                &format!("businesses/{}/businessSales/{}", business_id, business_sale_id),
                Some(&to_value(update)?),
            )
            .await?;
        extract(body, "businessSale")
    }

    pub async fn delete_business_sale(
        &self,
        business_id: i64,
        business_sale_id: i64,
    ) -> Result<(), ApiError> {
        self.send(
            Method::DELETE,
            &format!("businesses/{}/businessSales/{}", business_id, business_sale_id),
            None,
        )
        .await?;
        Ok(())
    }
}
