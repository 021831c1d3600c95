pub mod commands;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::YamClient;
use crate::guard::{Access, RouteGuard};
use crate::models::User;
use crate::routes::ResourceRef;
use crate::session::Session;
use crate::store::{Preferences, TokenStore};

#[derive(Parser)]
#[command(name = "yam")]
#[command(about = "Yam CLI - inventory and sales tracking for makers")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Manage your products")]
    Products {
        #[command(subcommand)]
        cmd: commands::products::ProductCommands,
    },

    #[command(about = "Manage your consignment businesses")]
    Businesses {
        #[command(subcommand)]
        cmd: commands::businesses::BusinessCommands,
    },

    #[command(about = "Record and manage sales")]
    Sales {
        #[command(subcommand)]
        cmd: commands::sales::SaleCommands,
    },

    #[command(about = "Profit dashboard")]
    Dashboard {
        #[arg(long, help = "Year to break down (defaults to the latest year with sales)")]
        year: Option<i32>,
    },

    #[command(about = "View and edit your profile")]
    Profile {
        #[command(subcommand)]
        cmd: commands::profile::ProfileCommands,
    },

    #[command(about = "Show or set the display theme")]
    Theme {
        #[arg(help = "Theme to switch to (light or dark)")]
        theme: Option<String>,
    },

    #[command(about = "Navigate an app path through the route table")]
    Open {
        #[arg(help = "App path, e.g. /users/7/products/5")]
        path: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs: the shared client, the session (single
/// writer of the current user), the route guard, and preferences.
pub struct AppContext {
    pub session: Session,
    pub guard: RouteGuard<Arc<YamClient>>,
    pub prefs: Preferences,
}

impl AppContext {
    pub fn from_env() -> anyhow::Result<Self> {
        let client = Arc::new(YamClient::new()?);
        let session = Session::new(Arc::clone(&client), TokenStore::new()?);
        let guard = RouteGuard::new(client);
        let prefs = Preferences::new()?;
        Ok(Self {
            session,
            guard,
            prefs,
        })
    }

    pub fn client(&self) -> &Arc<YamClient> {
        self.session.client()
    }

    /// Resolve the session and require a signed-in user, with no resource
    /// check beyond that.
    pub async fn require_user(&self) -> anyhow::Result<User> {
        self.authorize_resource(ResourceRef::None).await
    }

    /// Resolve the session and run the same ownership check the protected
    /// route for `resource` would run before rendering.
    pub async fn authorize_resource(&self, resource: ResourceRef) -> anyhow::Result<User> {
        self.session.resolve().await;
        let Some(user) = self.session.current_user() else {
            anyhow::bail!("no user logged in; try `yam auth login`");
        };

        match self
            .guard
            .authorize(Some(&user), Some(user.id), resource)
            .await
        {
            Access::Granted => Ok(user),
            Access::Denied => anyhow::bail!("not authorized"),
            Access::Superseded => anyhow::bail!("authorization check superseded; try again"),
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = AppContext::from_env()?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx, output_format).await,
        Commands::Products { cmd } => commands::products::handle(cmd, &ctx, output_format).await,
        Commands::Businesses { cmd } => {
            commands::businesses::handle(cmd, &ctx, output_format).await
        }
        Commands::Sales { cmd } => commands::sales::handle(cmd, &ctx, output_format).await,
        Commands::Dashboard { year } => {
            commands::dashboard::handle(year, &ctx, output_format).await
        }
        Commands::Profile { cmd } => commands::profile::handle(cmd, &ctx, output_format).await,
        Commands::Theme { theme } => commands::theme::handle(theme, &ctx, output_format).await,
        Commands::Open { path } => commands::open::handle(&path, &ctx, output_format).await,
    }
}
