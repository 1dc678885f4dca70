// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Starters and the per-resource controllers that implement them.

pub mod resource;

pub use resource::{Handler, Lifecycle, ResourceController};

use crate::context::Context;
use crate::error::Result;
use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};

/// A component that runs background processing once the operator starts
#[async_trait]
pub trait Starter: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Start caches and wait until their initial list has been observed
    async fn sync(&self, ctx: &Context) -> Result<()>;

    /// Sync, then start processing with up to `threadiness` concurrent workers
    async fn start(&self, ctx: &Context, threadiness: usize) -> Result<()>;
}

/// Sync every starter concurrently. The first failure is returned as is.
pub async fn sync(ctx: &Context, starters: &[Arc<dyn Starter>]) -> Result<()> {
    for starter in starters {
        debug!("Syncing {}", starter.name());
    }
    try_join_all(starters.iter().map(|s| s.sync(ctx))).await?;
    Ok(())
}

/// Sync every starter, then start each of them with the same threadiness
pub async fn start(ctx: &Context, threadiness: usize, starters: &[Arc<dyn Starter>]) -> Result<()> {
    sync(ctx, starters).await?;

    info!(
        "Starting {} starters with threadiness {}",
        starters.len(),
        threadiness
    );
    try_join_all(starters.iter().map(|s| s.start(ctx, threadiness))).await?;
    Ok(())
}
