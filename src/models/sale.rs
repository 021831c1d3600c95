use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A direct sale of a product, recorded under `products/:id/sales`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    pub user_id: i64,
    pub quantity_sold: i32,
    pub sale_price: Decimal,
    pub sale_date: DateTime<Utc>,
}

/// A consignment sale made through a business partner, recorded under
/// `businesses/:id/businessSales`. The percentage is the partner's cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSale {
    pub id: i64,
    pub business_id: i64,
    pub product_id: i64,
    pub user_id: i64,
    pub quantity_sold: i32,
    pub sale_price: Decimal,
    pub sale_date: DateTime<Utc>,
    pub business_percentage: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub product_id: i64,
    pub quantity_sold: i32,
    pub sale_price: Decimal,
    pub sale_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBusinessSale {
    pub product_id: i64,
    pub quantity_sold: i32,
    pub sale_price: Decimal,
    pub sale_date: DateTime<Utc>,
    pub business_percentage: Decimal,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_sold: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSaleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_sold: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_percentage: Option<Decimal>,
}

/// One row of the merged sales feed from `users/:id/allSalesInfo`.
///
/// Direct sales carry `saleId`; consignment sales carry `businessSaleId`
/// plus the business name and percentage. Exactly one of the two ids is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInfo {
    #[serde(default)]
    pub sale_id: Option<i64>,
    #[serde(default)]
    pub business_sale_id: Option<i64>,
    pub product_id: i64,
    #[serde(default)]
    pub business_id: Option<i64>,
    /// Product name.
    pub name: String,
    #[serde(default)]
    pub business_name: Option<String>,
    pub quantity_sold: i32,
    pub sale_price: Decimal,
    pub cost: Decimal,
    #[serde(default)]
    pub business_percentage: Option<Decimal>,
    pub sale_date: DateTime<Utc>,
}

impl SaleInfo {
    pub fn is_business_sale(&self) -> bool {
        self.business_sale_id.is_some()
    }

    /// Net profit for this sale: revenue minus the consignment share minus
    /// what the sold units cost to make, rounded to cents.
    ///
    /// An absent or zero percentage means no consignment share.
    pub fn profit(&self) -> Decimal {
        let quantity = Decimal::from(self.quantity_sold);
        let total_received = self.sale_price * quantity;
        let consignment_share = match self.business_percentage {
            Some(pct) if !pct.is_zero() => total_received * pct / Decimal::ONE_HUNDRED,
            _ => Decimal::ZERO,
        };
        let cost_to_make = self.cost * quantity;
        (total_received - consignment_share - cost_to_make).round_dp(2)
    }
}
