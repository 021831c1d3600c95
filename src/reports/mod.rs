//! Profit aggregation for the dashboard.
//!
//! Everything here works off the merged sales feed and the single profit
//! definition on [`SaleInfo`].

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::models::SaleInfo;

/// Profit for one month, split the way the dashboard chart plots it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthlyProfit {
    pub direct: Decimal,
    pub business: Decimal,
    pub combined: Decimal,
}

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Total profit per calendar year, ordered by year.
pub fn totals_by_year(sales: &[SaleInfo]) -> BTreeMap<i32, Decimal> {
    let mut totals = BTreeMap::new();
    for sale in sales {
        let year = sale.sale_date.year();
        *totals.entry(year).or_insert(Decimal::ZERO) += sale.profit();
    }
    totals
}

/// All-time total profit.
pub fn all_time_total(sales: &[SaleInfo]) -> Decimal {
    sales.iter().map(SaleInfo::profit).sum()
}

/// Monthly direct/business/combined profit for one year. Months without
/// sales stay at zero.
pub fn monthly_breakdown(sales: &[SaleInfo], year: i32) -> [MonthlyProfit; 12] {
    let mut months = [MonthlyProfit::default(); 12];
    for sale in sales {
        if sale.sale_date.year() != year {
            continue;
        }
        let month = sale.sale_date.month0() as usize;
        let profit = sale.profit();
        if sale.is_business_sale() {
            months[month].business += profit;
        } else {
            months[month].direct += profit;
        }
        months[month].combined += profit;
    }
    months
}

/// Years with at least one sale, newest first.
pub fn years(sales: &[SaleInfo]) -> Vec<i32> {
    let mut years: Vec<i32> = totals_by_year(sales).into_keys().collect();
    years.reverse();
    years
}

/// Order the feed the way every sales screen shows it: newest first.
pub fn sort_newest_first(sales: &mut [SaleInfo]) {
    sales.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
}
