//! `yam open <path>`: the SPA router made operable.
//!
//! The path is matched against the route table, the guard runs with exactly
//! the parameters that route carries, and on success the target screen
//! renders. A denial renders the not-authorized screen instead, the same
//! way the browser app redirects.

use super::{businesses, dashboard, products, profile, sales};
use crate::cli::utils::output_error;
use crate::cli::{AppContext, OutputFormat};
use crate::guard::Access;
use crate::routes::Route;

pub async fn handle(
    path: &str,
    ctx: &AppContext,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let route = Route::matches(path);

    match route {
        Route::Landing => {
            println!("yam — inventory and sales tracking for makers");
            println!("Log in with `yam auth login` or sign up with `yam auth register`.");
            return Ok(());
        }
        Route::Login => {
            println!("Use `yam auth login <username>`.");
            return Ok(());
        }
        Route::Register => {
            println!("Use `yam auth register <username> <email>`.");
            return Ok(());
        }
        Route::NotAuthorized => return render_not_authorized(&output_format),
        Route::NotFound => {
            output_error(&output_format, &format!("no screen at '{}'", path))?;
            anyhow::bail!("not found");
        }
        _ => {}
    }

    // Everything past this point is a protected route.
    ctx.session.resolve().await;
    let user = ctx.session.current_user();
    let params = route.params();
    let access = ctx
        .guard
        .authorize(user.as_ref(), params.user_id, route.resource())
        .await;

    match access {
        Access::Granted => {}
        Access::Denied => return render_not_authorized(&output_format),
        Access::Superseded => anyhow::bail!("authorization check superseded; try again"),
    }
    let Some(user) = user else {
        return render_not_authorized(&output_format);
    };

    match route {
        Route::Dashboard => dashboard::render(ctx, &output_format, &user, None).await,
        Route::Products { .. } => products::render_list(ctx, &output_format, &user).await,
        Route::ProductItem { product_id, .. } => {
            products::render_show(ctx, &output_format, &user, product_id).await
        }
        Route::Businesses { .. } => businesses::render_list(ctx, &output_format, &user).await,
        Route::Sales { .. } => sales::render_list(ctx, &output_format, &user).await,
        Route::Profile { .. } => profile::render_show(&output_format, &user),
        Route::ProductNew => {
            println!("Use `yam products add` to add a product.");
            Ok(())
        }
        Route::BusinessNew => {
            println!("Use `yam businesses add` to add a business.");
            Ok(())
        }
        Route::SaleNew => {
            println!("Use `yam sales add` to record a sale.");
            Ok(())
        }
        Route::BusinessUpdate { business_id } => {
            println!("Use `yam businesses update {}`.", business_id);
            Ok(())
        }
        Route::SaleUpdate {
            sale_id,
            product_id,
        } => {
            println!("Use `yam sales update {} {}`.", product_id, sale_id);
            Ok(())
        }
        Route::BusinessSaleUpdate {
            business_sale_id,
            business_id,
        } => {
            println!(
                "Use `yam sales update-business {} {}`.",
                business_id, business_sale_id
            );
            Ok(())
        }
        Route::ChangePassword { .. } => {
            println!("Use `yam profile change-password`.");
            Ok(())
        }
        // Public routes were handled above.
        Route::Landing
        | Route::Login
        | Route::Register
        | Route::NotAuthorized
        | Route::NotFound => Ok(()),
    }
}

fn render_not_authorized(output_format: &OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_error(output_format, "not authorized"),
        OutputFormat::Text => {
            println!("Not authorized to view this page.");
            println!("You can only view resources that belong to your account.");
            Ok(())
        }
    }
}
