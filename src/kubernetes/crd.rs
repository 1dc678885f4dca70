// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::client::{EXECUTION_RESOURCE, EXECUTION_RUN_RESOURCE, MODULE_RESOURCE};
use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::constants::{GROUP, VERSION};
use crate::error::Result;
use kube::{discovery::Discovery, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Wait until every kind of the group is served by the API server.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_crds(client: &Client) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match missing_kinds(client).await {
            Ok(missing) if missing.is_empty() => {
                info!("CRDs ({}/{}) are available", GROUP, VERSION);
                return Ok(());
            }
            Ok(missing) => {
                info!(
                    "CRDs {:?} ({}/{}) not yet available, waiting {} seconds...",
                    missing, GROUP, VERSION, interval
                );
            }
            Err(e) => {
                warn!(
                    "Error checking for {} CRDs: {}, retrying in {} seconds...",
                    GROUP, e, interval
                );
            }
        }

        sleep(Duration::from_secs(interval)).await;

        // Exponential backoff with max cap
        interval = next_interval(interval);
    }
}

fn next_interval(interval: u64) -> u64 {
    (interval * 2).min(POLL_MAX_INTERVAL_SECS)
}

/// Kinds of the group that discovery does not report yet
async fn missing_kinds(client: &Client) -> Result<Vec<&'static str>> {
    let discovery = Discovery::new(client.clone())
        .filter(&[GROUP])
        .run()
        .await?;

    let served: Vec<String> = discovery
        .groups()
        .filter(|group| group.name() == GROUP)
        .flat_map(|group| group.versioned_resources(VERSION))
        .map(|(ar, _)| ar.kind)
        .collect();

    Ok(unserved_kinds(&served))
}

fn unserved_kinds(served: &[String]) -> Vec<&'static str> {
    [MODULE_RESOURCE, EXECUTION_RESOURCE, EXECUTION_RUN_RESOURCE]
        .iter()
        .map(|r| r.kind)
        .filter(|kind| !served.iter().any(|s| s.as_str() == *kind))
        .collect()
}
