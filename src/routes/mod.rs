//! The application's route schema.
//!
//! Screens are addressed by SPA-style paths (`/users/7/products/5`). Each
//! path maps to exactly one [`Route`], each route knows its URL parameters,
//! and each protected route derives the single resource whose ownership the
//! guard must verify. Deriving the resource from the route (instead of
//! probing whichever id parameters happen to be present) keeps the check
//! unambiguous when a path carries more than one id.

/// Identifiers carried in the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteParams {
    pub user_id: Option<i64>,
    pub product_id: Option<i64>,
    pub business_id: Option<i64>,
    pub sale_id: Option<i64>,
    pub business_sale_id: Option<i64>,
}

/// The one resource a route references, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRef {
    None,
    Product { product_id: i64 },
    Business { business_id: i64 },
    Sale { product_id: i64, sale_id: i64 },
    BusinessSale { business_id: i64, business_sale_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
    Products { user_id: i64 },
    ProductItem { user_id: i64, product_id: i64 },
    ProductNew,
    Businesses { user_id: i64 },
    BusinessNew,
    BusinessUpdate { business_id: i64 },
    Sales { user_id: i64 },
    SaleNew,
    SaleUpdate { sale_id: i64, product_id: i64 },
    BusinessSaleUpdate { business_sale_id: i64, business_id: i64 },
    Profile { user_id: i64 },
    ChangePassword { user_id: i64 },
    NotAuthorized,
    NotFound,
}

impl Route {
    /// Match a path against the route table. Unknown paths and paths with
    /// non-numeric ids land on `NotFound`.
    pub fn matches(path: &str) -> Route {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        Self::try_match(&segments).unwrap_or(Route::NotFound)
    }

    fn try_match(segments: &[&str]) -> Option<Route> {
        let route = match segments {
            [] => Route::Landing,
            ["users", "login"] => Route::Login,
            ["users", "register"] => Route::Register,
            ["users", "dashboard"] => Route::Dashboard,
            ["products", "add-product"] => Route::ProductNew,
            ["businesses", "add-business"] => Route::BusinessNew,
            ["sales", "add-sale"] => Route::SaleNew,
            ["not-authorized"] => Route::NotAuthorized,
            ["users", user_id, "products"] => Route::Products {
                user_id: parse_id(user_id)?,
            },
            ["users", user_id, "products", product_id] => Route::ProductItem {
                user_id: parse_id(user_id)?,
                product_id: parse_id(product_id)?,
            },
            ["users", user_id, "businesses"] => Route::Businesses {
                user_id: parse_id(user_id)?,
            },
            ["users", user_id, "sales"] => Route::Sales {
                user_id: parse_id(user_id)?,
            },
            ["users", user_id, "profile"] => Route::Profile {
                user_id: parse_id(user_id)?,
            },
            ["users", user_id, "change-password"] => Route::ChangePassword {
                user_id: parse_id(user_id)?,
            },
            ["businesses", business_id, "update"] => Route::BusinessUpdate {
                business_id: parse_id(business_id)?,
            },
            ["sales", sale_id, "products", product_id] => Route::SaleUpdate {
                sale_id: parse_id(sale_id)?,
                product_id: parse_id(product_id)?,
            },
            ["businessSales", business_sale_id, "businesses", business_id] => {
                Route::BusinessSaleUpdate {
                    business_sale_id: parse_id(business_sale_id)?,
                    business_id: parse_id(business_id)?,
                }
            }
            _ => return None,
        };
        Some(route)
    }

    /// Routes that only render for an authorized user.
    pub fn is_protected(&self) -> bool {
        !matches!(
            self,
            Route::Landing
                | Route::Login
                | Route::Register
                | Route::NotAuthorized
                | Route::NotFound
        )
    }

    pub fn params(&self) -> RouteParams {
        let mut params = RouteParams::default();
        match *self {
            Route::Products { user_id }
            | Route::Businesses { user_id }
            | Route::Sales { user_id }
            | Route::Profile { user_id }
            | Route::ChangePassword { user_id } => params.user_id = Some(user_id),
            Route::ProductItem {
                user_id,
                product_id,
            } => {
                params.user_id = Some(user_id);
                params.product_id = Some(product_id);
            }
            Route::BusinessUpdate { business_id } => params.business_id = Some(business_id),
            Route::SaleUpdate {
                sale_id,
                product_id,
            } => {
                params.sale_id = Some(sale_id);
                params.product_id = Some(product_id);
            }
            Route::BusinessSaleUpdate {
                business_sale_id,
                business_id,
            } => {
                params.business_sale_id = Some(business_sale_id);
                params.business_id = Some(business_id);
            }
            _ => {}
        }
        params
    }

    /// The resource whose ownership gates this route.
    pub fn resource(&self) -> ResourceRef {
        match *self {
            Route::ProductItem { product_id, .. } => ResourceRef::Product { product_id },
            Route::BusinessUpdate { business_id } => ResourceRef::Business { business_id },
            Route::SaleUpdate {
                sale_id,
                product_id,
            } => ResourceRef::Sale {
                product_id,
                sale_id,
            },
            Route::BusinessSaleUpdate {
                business_sale_id,
                business_id,
            } => ResourceRef::BusinessSale {
                business_id,
                business_sale_id,
            },
            _ => ResourceRef::None,
        }
    }
}

fn parse_id(segment: &str) -> Option<i64> {
    segment.parse().ok()
}
