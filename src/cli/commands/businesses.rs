use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_json, output_success, print_table};
use crate::cli::{AppContext, OutputFormat};
use crate::models::{Business, BusinessUpdate, NewBusiness, User};
use crate::routes::ResourceRef;

#[derive(Subcommand)]
pub enum BusinessCommands {
    #[command(about = "List your consignment businesses")]
    List,

    #[command(about = "Add a business")]
    Add {
        #[arg(help = "Business name")]
        name: String,
        #[arg(long, help = "Contact details (phone, email, address)")]
        contact_info: Option<String>,
    },

    #[command(about = "Update a business")]
    Update {
        #[arg(help = "Business id")]
        business_id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        contact_info: Option<String>,
    },

    #[command(about = "Delete a business")]
    Delete {
        #[arg(help = "Business id")]
        business_id: i64,
    },
}

pub async fn handle(
    cmd: BusinessCommands,
    ctx: &AppContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        BusinessCommands::List => {
            let user = ctx.require_user().await?;
            render_list(ctx, &output_format, &user).await
        }
        BusinessCommands::Add { name, contact_info } => {
            let user = ctx.require_user().await?;
            let business = ctx
                .client()
                .create_business(user.id, &NewBusiness { name, contact_info })
                .await?;
            output_success(
                &output_format,
                &format!("Business '{}' added (id {})", business.name, business.id),
                Some(json!({ "business": business })),
            )
        }
        BusinessCommands::Update {
            business_id,
            name,
            contact_info,
        } => {
            let user = ctx
                .authorize_resource(ResourceRef::Business { business_id })
                .await?;
            let business = ctx
                .client()
                .update_business(user.id, business_id, &BusinessUpdate { name, contact_info })
                .await?;
            output_success(
                &output_format,
                &format!("Business '{}' updated", business.name),
                Some(json!({ "business": business })),
            )
        }
        BusinessCommands::Delete { business_id } => {
            let user = ctx
                .authorize_resource(ResourceRef::Business { business_id })
                .await?;
            ctx.client().delete_business(user.id, business_id).await?;
            output_success(
                &output_format,
                &format!("Business {} deleted", business_id),
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
    let businesses = ctx.client().get_all_businesses(user.id).await?;

    match output_format {
        OutputFormat::Json => output_json(&json!({ "businesses": businesses })),
        OutputFormat::Text => {
            if businesses.is_empty() {
                println!("No businesses yet. Add one with `yam businesses add`.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = businesses.iter().map(business_row).collect();
            print_table(&["ID", "Name", "Contact"], &rows);
            Ok(())
        }
    }
}

fn business_row(business: &Business) -> Vec<String> {
    vec![
        business.id.to_string(),
        business.name.clone(),
        business.contact_info.clone().unwrap_or_default(),
    ]
}
