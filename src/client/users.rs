use reqwest::Method;
use serde_json::to_value;

use super::{extract, YamClient};
use crate::error::ApiError;
use crate::models::{LoginData, RegisterData, SaleInfo, User, UserUpdate};

impl YamClient {
    /// Register a new account. Returns the session token.
    pub async fn register(&self, data: &RegisterData) -> Result<String, ApiError> {
        let body = self
            .send(Method::POST, "users/register", Some(&to_value(data)?))
            .await?;
        extract(body, "token")
    }

    /// Log in with username/password. Returns the session token.
    pub async fn login(&self, data: &LoginData) -> Result<String, ApiError> {
        let body = self
            .send(Method::POST, "users/login", Some(&to_value(data)?))
            .await?;
        extract(body, "token")
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, ApiError> {
        let body = self
            .send(Method::GET, &format!("users/{}", user_id), None)
            .await?;
        extract(body, "user")
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, ApiError> {
        let body = self.send(Method::GET, "users", None).await?;
        extract(body, "users")
    }

    pub async fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<User, ApiError> {
        let body = self
            .send(
                Method::PATCH,
                &format!("users/{}", user_id),
                Some(&to_value(update)?),
            )
            .await?;
        extract(body, "user")
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.send(Method::DELETE, &format!("users/{}", user_id), None)
            .await?;
        Ok(())
    }

    /// The merged sales feed: direct sales and business sales in one list.
    pub async fn all_sales_info(&self, user_id: i64) -> Result<Vec<SaleInfo>, ApiError> {
        let body = self
            .send(
                Method::GET,
                &format!("users/{}/allSalesInfo", user_id),
                None,
            )
            .await?;
        extract(body, "sales")
    }
}
