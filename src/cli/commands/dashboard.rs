use serde_json::json;

use crate::cli::utils::{output_json, print_table};
use crate::cli::{AppContext, OutputFormat};
use crate::models::User;
use crate::reports::{self, MONTH_LABELS};

pub async fn handle(
    year: Option<i32>,
    ctx: &AppContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let user = ctx.require_user().await?;
    render(ctx, &output_format, &user, year).await
}

pub async fn render(
    ctx: &AppContext,
    output_format: &OutputFormat,
    user: &User,
    year: Option<i32>,
) -> anyhow::Result<()> {
    let mut sales = ctx.client().all_sales_info(user.id).await?;
    reports::sort_newest_first(&mut sales);

    let years = reports::years(&sales);
    let selected = year.or_else(|| years.first().copied());
    let totals = reports::totals_by_year(&sales);
    let all_time = reports::all_time_total(&sales);

    match output_format {
        OutputFormat::Json => {
            let mut totals_json = serde_json::Map::new();
            for (y, total) in &totals {
                totals_json.insert(y.to_string(), json!(total));
            }
            let monthly = selected.map(|y| {
                reports::monthly_breakdown(&sales, y)
                    .iter()
                    .zip(MONTH_LABELS.iter())
                    .map(|(m, label)| {
                        json!({
                            "month": label,
                            "direct": m.direct,
                            "business": m.business,
                            "combined": m.combined,
                        })
                    })
                    .collect::<Vec<_>>()
            });
            output_json(&json!({
                "totalAllTime": all_time,
                "totalsByYear": totals_json,
                "year": selected,
                "monthly": monthly,
                "recentSales": sales.iter().take(5).collect::<Vec<_>>(),
            }))
        }
        OutputFormat::Text => {
            println!("Total money made: ${}", all_time.round_dp(2));
            for (y, total) in totals.iter().rev() {
                println!("  {}: ${}", y, total.round_dp(2));
            }

            let Some(selected) = selected else {
                println!("No sales yet — nothing to chart.");
                return Ok(());
            };

            println!();
            println!("Monthly profit for {}:", selected);
            let months = reports::monthly_breakdown(&sales, selected);
            let rows: Vec<Vec<String>> = months
                .iter()
                .zip(MONTH_LABELS.iter())
                .map(|(m, label)| {
                    vec![
                        (*label).to_string(),
                        m.direct.round_dp(2).to_string(),
                        m.business.round_dp(2).to_string(),
                        m.combined.round_dp(2).to_string(),
                    ]
                })
                .collect();
            print_table(&["Month", "Direct", "Business", "Combined"], &rows);

            if !sales.is_empty() {
                println!();
                println!("Recent sales:");
                let rows: Vec<Vec<String>> = sales
                    .iter()
                    .take(5)
                    .map(|sale| {
                        vec![
                            sale.sale_date.format("%Y-%m-%d").to_string(),
                            sale.name.clone(),
                            sale.quantity_sold.to_string(),
                            sale.profit().to_string(),
                        ]
                    })
                    .collect();
                print_table(&["Date", "Product", "Qty", "Profit"], &rows);
            }
            Ok(())
        }
    }
}
