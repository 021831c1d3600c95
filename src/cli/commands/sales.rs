use chrono::{DateTime, Utc};
use clap::Subcommand;
use rust_decimal::Decimal;
use serde_json::json;

use crate::cli::utils::{output_json, output_success, print_table};
use crate::cli::{AppContext, OutputFormat};
use crate::models::{
    BusinessSaleUpdate, NewBusinessSale, NewSale, ProductUpdate, SaleInfo, SaleUpdate, User,
};
use crate::reports;
use crate::routes::ResourceRef;

#[derive(Subcommand)]
pub enum SaleCommands {
    #[command(about = "List all your sales, direct and consignment, newest first")]
    List,

    #[command(about = "Record a sale (pass --business-id for a consignment sale)")]
    Add {
        #[arg(long, help = "Product that was sold")]
        product_id: i64,
        #[arg(long, default_value_t = 1, help = "Units sold")]
        quantity: i32,
        #[arg(long, help = "Sale price per unit (defaults to the product price)")]
        price: Option<Decimal>,
        #[arg(long, help = "Sale date, RFC 3339 (defaults to now)")]
        date: Option<DateTime<Utc>>,
        #[arg(long, help = "Business the sale went through")]
        business_id: Option<i64>,
        #[arg(
            long,
            requires = "business_id",
            help = "Business cut as a percentage (0-100)"
        )]
        business_percentage: Option<Decimal>,
    },

    #[command(about = "Update a direct sale")]
    Update {
        #[arg(help = "Product id")]
        product_id: i64,
        #[arg(help = "Sale id")]
        sale_id: i64,
        #[arg(long)]
        quantity: Option<i32>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },

    #[command(about = "Update a consignment sale")]
    UpdateBusiness {
        #[arg(help = "Business id")]
        business_id: i64,
        #[arg(help = "Business sale id")]
        business_sale_id: i64,
        #[arg(long)]
        quantity: Option<i32>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        date: Option<DateTime<Utc>>,
        #[arg(long, help = "Business cut as a percentage (0-100)")]
        business_percentage: Option<Decimal>,
    },

    #[command(about = "Delete a direct sale and restock the product")]
    Delete {
        #[arg(help = "Product id")]
        product_id: i64,
        #[arg(help = "Sale id")]
        sale_id: i64,
    },

    #[command(about = "Delete a consignment sale")]
    DeleteBusiness {
        #[arg(help = "Business id")]
        business_id: i64,
        #[arg(help = "Business sale id")]
        business_sale_id: i64,
    },
}

pub async fn handle(
    cmd: SaleCommands,
    ctx: &AppContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        SaleCommands::List => {
            let user = ctx.require_user().await?;
            render_list(ctx, &output_format, &user).await
        }
        SaleCommands::Add {
            product_id,
            quantity,
            price,
            date,
            business_id,
            business_percentage,
        } => {
            let user = ctx.require_user().await?;
            let product = ctx.client().get_product(user.id, product_id).await?;
            let sale_price = price.unwrap_or(product.price);
            let sale_date = date.unwrap_or_else(Utc::now);

            if let Some(business_id) = business_id {
                let sale = ctx
                    .client()
                    .create_business_sale(
                        business_id,
                        &NewBusinessSale {
                            product_id,
                            quantity_sold: quantity,
                            sale_price,
                            sale_date,
                            business_percentage: business_percentage.unwrap_or(Decimal::ZERO),
                        },
                    )
                    .await?;
                output_success(
                    &output_format,
                    &format!("Consignment sale recorded (id {})", sale.id),
                    Some(json!({ "businessSale": sale })),
                )
            } else {
                let sale = ctx
                    .client()
                    .create_sale(
                        product_id,
                        &NewSale {
                            product_id,
                            quantity_sold: quantity,
                            sale_price,
                            sale_date,
                        },
                    )
                    .await?;

                // Keep stock in step with the sale.
                let new_quantity = product.quantity - quantity;
                ctx.client()
                    .update_product(user.id, product_id, &ProductUpdate::quantity(new_quantity))
                    .await?;

                output_success(
                    &output_format,
                    &format!(
                        "Sale recorded (id {}); {} now has {} in stock",
                        sale.id, product.name, new_quantity
                    ),
                    Some(json!({ "sale": sale })),
                )
            }
        }
        SaleCommands::Update {
            product_id,
            sale_id,
            quantity,
            price,
            date,
        } => {
            ctx.authorize_resource(ResourceRef::Sale {
                product_id,
                sale_id,
            })
            .await?;
            let sale = ctx
                .client()
                .update_sale(
                    product_id,
                    sale_id,
                    &SaleUpdate {
                        quantity_sold: quantity,
                        sale_price: price,
                        sale_date: date,
                    },
                )
                .await?;
            output_success(
                &output_format,
                &format!("Sale {} updated", sale.id),
                Some(json!({ "sale": sale })),
            )
        }
        SaleCommands::UpdateBusiness {
            business_id,
            business_sale_id,
            quantity,
            price,
            date,
            business_percentage,
        } => {
            ctx.authorize_resource(ResourceRef::BusinessSale {
                business_id,
                business_sale_id,
            })
            .await?;
            let sale = ctx
                .client()
                .update_business_sale(
                    business_id,
                    business_sale_id,
                    &BusinessSaleUpdate {
                        quantity_sold: quantity,
                        sale_price: price,
                        sale_date: date,
                        business_percentage,
                    },
                )
                .await?;
            output_success(
                &output_format,
                &format!("Consignment sale {} updated", sale.id),
                Some(json!({ "businessSale": sale })),
            )
        }
        SaleCommands::Delete {
            product_id,
            sale_id,
        } => {
            let user = ctx
                .authorize_resource(ResourceRef::Sale {
                    product_id,
                    sale_id,
                })
                .await?;

            // Put the sold units back before the sale record goes away.
            let sale = ctx.client().get_sale(product_id, sale_id).await?;
            let product = ctx.client().get_product(user.id, product_id).await?;
            let new_quantity = product.quantity + sale.quantity_sold;
            ctx.client()
                .update_product(user.id, product_id, &ProductUpdate::quantity(new_quantity))
                .await?;

            ctx.client().delete_sale(product_id, sale_id).await?;
            output_success(
                &output_format,
                &format!(
                    "Sale {} deleted; {} restocked to {}",
                    sale_id, product.name, new_quantity
                ),
                None,
            )
        }
        SaleCommands::DeleteBusiness {
            business_id,
            business_sale_id,
        } => {
            ctx.authorize_resource(ResourceRef::BusinessSale {
                business_id,
                business_sale_id,
            })
            .await?;
            ctx.client()
                .delete_business_sale(business_id, business_sale_id)
                .await?;
            output_success(
                &output_format,
                &format!("Consignment sale {} deleted", business_sale_id),
                None,
            )
        }
    }
}

pub async fn render_list(
    ctx: &AppContext,
    output_format: &OutputFormat,
    user: &User,
) -> anyhow::Result<()> {
    let mut sales = ctx.client().all_sales_info(user.id).await?;
    reports::sort_newest_first(&mut sales);

    match output_format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = sales
                .iter()
                .map(|sale| {
                    let mut row = json!(sale);
                    row["profit"] = json!(sale.profit());
                    row
                })
                .collect();
            output_json(&json!({ "sales": rows }))
        }
        OutputFormat::Text => {
            if sales.is_empty() {
                println!("No sales yet. Record one with `yam sales add`.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = sales.iter().map(sale_row).collect();
            print_table(
                &[
                    "Date", "Product", "Qty", "Price", "Cost", "Business", "Pct", "Profit",
                ],
                &rows,
            );
            Ok(())
        }
    }
}

fn sale_row(sale: &SaleInfo) -> Vec<String> {
    vec![
        sale.sale_date.format("%Y-%m-%d").to_string(),
        sale.name.clone(),
        sale.quantity_sold.to_string(),
        sale.sale_price.to_string(),
        (sale.cost * Decimal::from(sale.quantity_sold)).to_string(),
        sale.business_name.clone().unwrap_or_else(|| "N/A".to_string()),
        sale.business_percentage
            .map(|p| p.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        sale.profit().to_string(),
    ]
}
