use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_json, output_success, resolve_password};
use crate::cli::{AppContext, OutputFormat};
use crate::models::{User, UserUpdate};

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show your profile")]
    Show,

    #[command(about = "Update profile fields")]
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },

    #[command(about = "Change your password")]
    ChangePassword {
        #[arg(long, help = "New password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Delete your account and log out")]
    DeleteAccount {
        #[arg(long, help = "Confirm the deletion")]
        yes: bool,
    },
}

pub async fn handle(
    cmd: ProfileCommands,
    ctx: &AppContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ProfileCommands::Show => {
            let user = ctx.require_user().await?;
            render_show(&output_format, &user)
        }
        ProfileCommands::Update {
            username,
            first_name,
            last_name,
            email,
        } => {
            let user = ctx.require_user().await?;
            let update = UserUpdate {
                username,
                first_name,
                last_name,
                email,
                password: None,
            };
            if update.is_empty() {
                anyhow::bail!("nothing to update; pass at least one field flag");
            }
            let updated = ctx.client().update_user(user.id, &update).await?;
            output_success(
                &output_format,
                &format!("Profile updated for {}", updated.username),
                Some(json!({ "user": updated })),
            )
        }
        ProfileCommands::ChangePassword { password } => {
            let user = ctx.require_user().await?;
            let password = resolve_password(password)?;
            ctx.client()
                .update_user(
                    user.id,
                    &UserUpdate {
                        password: Some(password),
                        ..Default::default()
                    },
                )
                .await?;
            output_success(&output_format, "Password changed", None)
        }
        ProfileCommands::DeleteAccount { yes } => {
            if !yes {
                anyhow::bail!("this permanently deletes your account; pass --yes to confirm");
            }
            let user = ctx.require_user().await?;
            ctx.client().delete_user(user.id).await?;
            ctx.session.logout();
            output_success(&output_format, "Account deleted", None)
        }
    }
}

pub fn render_show(output_format: &OutputFormat, user: &User) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(&json!({ "user": user })),
        OutputFormat::Text => {
            println!("{} (id {})", user.display_name(), user.id);
            println!("Username: {}", user.username);
            if let Some(email) = &user.email {
                println!("Email: {}", email);
            }
            Ok(())
        }
    }
}
