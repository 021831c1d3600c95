//! Route authorization: ownership checks before a screen renders.
//!
//! The guard answers one question: may the current user see the resource the
//! route points at? A missing user, a path `userId` that is not theirs, a
//! resource owned by someone else, and a resource that cannot be fetched at
//! all (404 included) all collapse into the same denial.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::client::YamClient;
use crate::error::ApiError;
use crate::models::User;
use crate::routes::ResourceRef;

/// Outcome of one authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
    /// A newer check started while this one was in flight; the result must
    /// be discarded, not acted on.
    Superseded,
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }
}

/// Where the guard looks up who owns a referenced resource.
///
/// `user_id` is the requesting user's id, needed because product and
/// business lookups are scoped under `users/:id/...` on the backend.
#[async_trait]
pub trait OwnershipSource: Send + Sync {
    async fn owner_id(
        &self,
        user_id: i64,
        resource: &ResourceRef,
    ) -> Result<Option<i64>, ApiError>;
}

#[async_trait]
impl OwnershipSource for YamClient {
    async fn owner_id(
        &self,
        user_id: i64,
        resource: &ResourceRef,
    ) -> Result<Option<i64>, ApiError> {
        match *resource {
            ResourceRef::None => Ok(None),
            ResourceRef::Product { product_id } => {
                Ok(Some(self.get_product(user_id, product_id).await?.user_id))
            }
            ResourceRef::Business { business_id } => {
                Ok(Some(self.get_business(user_id, business_id).await?.user_id))
            }
            ResourceRef::Sale {
                product_id,
                sale_id,
            } => Ok(Some(self.get_sale(product_id, sale_id).await?.user_id)),
            ResourceRef::BusinessSale {
                business_id,
                business_sale_id,
            } => Ok(Some(
                self.get_business_sale(business_id, business_sale_id)
                    .await?
                    .user_id,
            )),
        }
    }
}

#[async_trait]
impl<S: OwnershipSource> OwnershipSource for std::sync::Arc<S> {
    async fn owner_id(
        &self,
        user_id: i64,
        resource: &ResourceRef,
    ) -> Result<Option<i64>, ApiError> {
        (**self).owner_id(user_id, resource).await
    }
}

pub struct RouteGuard<S> {
    source: S,
    seq: AtomicU64,
}

impl<S: OwnershipSource> RouteGuard<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            seq: AtomicU64::new(0),
        }
    }

    /// Run the ownership check for one navigation.
    ///
    /// Every call takes a fresh sequence ticket; if another call starts
    /// before this one finishes, this one's result comes back `Superseded`
    /// so a slow, stale check can never overwrite a newer decision.
    pub async fn authorize(
        &self,
        user: Option<&User>,
        route_user_id: Option<i64>,
        resource: ResourceRef,
    ) -> Access {
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let access = self.check(user, route_user_id, resource).await;

        if self.seq.load(Ordering::SeqCst) != ticket {
            tracing::debug!("authorization check {} superseded, discarding result", ticket);
            return Access::Superseded;
        }
        access
    }

    async fn check(
        &self,
        user: Option<&User>,
        route_user_id: Option<i64>,
        resource: ResourceRef,
    ) -> Access {
        let Some(user) = user else {
            return Access::Denied;
        };

        if let Some(route_user_id) = route_user_id {
            if route_user_id != user.id {
                return Access::Denied;
            }
        }

        match self.source.owner_id(user.id, &resource).await {
            Ok(None) => Access::Granted,
            Ok(Some(owner_id)) if owner_id == user.id => Access::Granted,
            Ok(Some(owner_id)) => {
                tracing::debug!(
                    "user {} denied: resource {:?} belongs to {}",
                    user.id,
                    resource,
                    owner_id
                );
                Access::Denied
            }
            Err(err) => {
                // Not-found and not-yours are deliberately indistinguishable.
                tracing::debug!("ownership lookup failed, denying: {}", err);
                Access::Denied
            }
        }
    }
}
