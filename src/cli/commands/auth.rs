use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_json, output_success, resolve_password};
use crate::cli::{AppContext, OutputFormat};
use crate::models::{LoginData, RegisterData};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register a new account (logs you in immediately)")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, default_value = "", help = "First name")]
        first_name: String,
        #[arg(long, default_value = "", help = "Last name")]
        last_name: String,
    },

    #[command(about = "Log in to the backend")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Log out and forget the stored session")]
    Logout,

    #[command(about = "Show the current session")]
    Whoami,
}

pub async fn handle(
    cmd: AuthCommands,
    ctx: &AppContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            let password = resolve_password(password)?;
            let user = ctx
                .session
                .register(&RegisterData {
                    username,
                    password,
                    first_name,
                    last_name,
                    email,
                })
                .await?;
            output_success(
                &output_format,
                &format!("Registered and logged in as {}", user.username),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Login { username, password } => {
            let password = resolve_password(password)?;
            let user = ctx.session.login(&LoginData { username, password }).await?;
            output_success(
                &output_format,
                &format!("Logged in as {}", user.username),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Logout => {
            ctx.session.logout();
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            ctx.session.resolve().await;
            match ctx.session.current_user() {
                Some(user) => match output_format {
                    OutputFormat::Json => output_json(&json!({ "user": user })),
                    OutputFormat::Text => {
                        println!("Logged in as {} (id {})", user.username, user.id);
                        if let Some(email) = &user.email {
                            println!("Email: {}", email);
                        }
                        Ok(())
                    }
                },
                None => match output_format {
                    OutputFormat::Json => output_json(&json!({ "user": null })),
                    OutputFormat::Text => {
                        println!("Not logged in");
                        Ok(())
                    }
                },
            }
        }
    }
}
