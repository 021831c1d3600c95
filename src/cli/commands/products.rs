use clap::Subcommand;
use rust_decimal::Decimal;
use serde_json::json;

use crate::cli::utils::{output_json, output_success, print_table};
use crate::cli::{AppContext, OutputFormat};
use crate::models::{NewProduct, Product, ProductUpdate, User};
use crate::routes::ResourceRef;

#[derive(Subcommand)]
pub enum ProductCommands {
    #[command(about = "List your products")]
    List,

    #[command(about = "Show one product")]
    Show {
        #[arg(help = "Product id")]
        product_id: i64,
    },

    #[command(about = "Add a product")]
    Add {
        #[arg(help = "Product name")]
        name: String,
        #[arg(long, help = "Selling price")]
        price: Decimal,
        #[arg(long, help = "Cost to make one unit")]
        cost: Decimal,
        #[arg(long, default_value_t = 0, help = "Units in stock")]
        quantity: i32,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        sku: Option<String>,
        #[arg(long, help = "Minutes to make one unit")]
        minutes_to_make: Option<i32>,
        #[arg(long = "type", help = "Product category")]
        kind: Option<String>,
    },

    #[command(about = "Update a product")]
    Update {
        #[arg(help = "Product id")]
        product_id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        cost: Option<Decimal>,
        #[arg(long)]
        sku: Option<String>,
        #[arg(long)]
        minutes_to_make: Option<i32>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        quantity: Option<i32>,
    },

    #[command(about = "Delete a product")]
    Delete {
        #[arg(help = "Product id")]
        product_id: i64,
    },
}

pub async fn handle(
    cmd: ProductCommands,
    ctx: &AppContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ProductCommands::List => {
            let user = ctx.require_user().await?;
            render_list(ctx, &output_format, &user).await
        }
        ProductCommands::Show { product_id } => {
            let user = ctx
                .authorize_resource(ResourceRef::Product { product_id })
                .await?;
            render_show(ctx, &output_format, &user, product_id).await
        }
        ProductCommands::Add {
            name,
            price,
            cost,
            quantity,
            description,
            sku,
            minutes_to_make,
            kind,
        } => {
            let user = ctx.require_user().await?;
            let product = ctx
                .client()
                .create_product(
                    user.id,
                    &NewProduct {
                        name,
                        description,
                        price,
                        cost,
                        sku,
                        minutes_to_make,
                        kind,
                        quantity,
                    },
                )
                .await?;
            output_success(
                &output_format,
                &format!("Product '{}' added (id {})", product.name, product.id),
                Some(json!({ "product": product })),
            )
        }
        ProductCommands::Update {
            product_id,
            name,
            description,
            price,
            cost,
            sku,
            minutes_to_make,
            kind,
            quantity,
        } => {
            let user = ctx
                .authorize_resource(ResourceRef::Product { product_id })
                .await?;
            let product = ctx
                .client()
                .update_product(
                    user.id,
                    product_id,
                    &ProductUpdate {
                        name,
                        description,
                        price,
                        cost,
                        sku,
                        minutes_to_make,
                        kind,
                        quantity,
                    },
                )
                .await?;
            output_success(
                &output_format,
                &format!("Product '{}' updated", product.name),
                Some(json!({ "product": product })),
            )
        }
        ProductCommands::Delete { product_id } => {
            let user = ctx
                .authorize_resource(ResourceRef::Product { product_id })
                .await?;
            ctx.client().delete_product(user.id, product_id).await?;
            output_success(
                &output_format,
                &format!("Product {} deleted", product_id),
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
    let products = ctx.client().get_all_products(user.id).await?;

    match output_format {
        OutputFormat::Json => output_json(&json!({ "products": products })),
        OutputFormat::Text => {
            if products.is_empty() {
                println!("No products yet. Add one with `yam products add`.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = products.iter().map(product_row).collect();
            print_table(
                &["ID", "Name", "Type", "Price", "Cost", "Qty", "SKU"],
                &rows,
            );
            Ok(())
        }
    }
}

pub async fn render_show(
    ctx: &AppContext,
    output_format: &OutputFormat,
    user: &User,
    product_id: i64,
) -> anyhow::Result<()> {
    let product = ctx.client().get_product(user.id, product_id).await?;

    match output_format {
        OutputFormat::Json => output_json(&json!({ "product": product })),
        OutputFormat::Text => {
            println!("{} (id {})", product.name, product.id);
            if let Some(kind) = &product.kind {
                println!("Type: {}", kind);
            }
            println!("Price: {}", product.price);
            println!("Cost: {}", product.cost);
            println!("In stock: {}", product.quantity);
            if let Some(minutes) = product.minutes_to_make {
                println!("Minutes to make: {}", minutes);
            }
            if let Some(sku) = &product.sku {
                println!("SKU: {}", sku);
            }
            if let Some(description) = &product.description {
                println!("{}", description);
            }
            Ok(())
        }
    }
}

fn product_row(product: &Product) -> Vec<String> {
    vec![
        product.id.to_string(),
        product.name.clone(),
        product.kind.clone().unwrap_or_default(),
        product.price.to_string(),
        product.cost.to_string(),
        product.quantity.to_string(),
        product.sku.clone().unwrap_or_default(),
    ]
}
