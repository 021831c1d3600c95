use serde_json::json;

use crate::cli::utils::{output_json, output_success};
use crate::cli::{AppContext, OutputFormat};
use crate::store::Theme;

pub async fn handle(
    theme: Option<String>,
    ctx: &AppContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match theme {
        Some(raw) => {
            let theme: Theme = raw.parse().map_err(|err: String| anyhow::anyhow!(err))?;
            ctx.prefs.set_theme(theme)?;
            output_success(
                &output_format,
                &format!("Theme set to {}", theme.as_str()),
                Some(json!({ "theme": theme.as_str() })),
            )
        }
        None => {
            let theme = ctx.prefs.theme();
            match output_format {
                OutputFormat::Json => output_json(&json!({ "theme": theme.as_str() })),
                OutputFormat::Text => {
                    println!("Theme: {}", theme.as_str());
                    Ok(())
                }
            }
        }
    }
}
