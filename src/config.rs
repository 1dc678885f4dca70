// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::controller::DEFAULT_THREADINESS;
use anyhow::{bail, Context, Result};
use std::env;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Namespace to watch, empty for all namespaces
    pub namespace: String,
    /// Concurrent workers per controller
    pub threadiness: usize,
    /// Media type negotiated with the API server
    pub serializer: Option<String>,
    pub wait_for_crds: bool,
    /// Print the CRD manifests and exit
    pub print_crds: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let namespace = lookup("WATCH_NAMESPACE").unwrap_or_default();

        let threadiness = match lookup("TERRAFORM_OPERATOR_THREADINESS") {
            Some(v) => v
                .parse::<usize>()
                .with_context(|| format!("TERRAFORM_OPERATOR_THREADINESS is not a number: {}", v))?,
            None => DEFAULT_THREADINESS,
        };
        if threadiness == 0 {
            bail!("TERRAFORM_OPERATOR_THREADINESS must be at least 1");
        }

        let serializer = lookup("TERRAFORM_OPERATOR_SERIALIZER").filter(|s| !s.is_empty());
        let wait_for_crds = parse_bool(&lookup, "TERRAFORM_OPERATOR_WAIT_FOR_CRDS", true)?;
        let print_crds = parse_bool(&lookup, "TERRAFORM_OPERATOR_PRINT_CRDS", false)?;

        Ok(Config {
            namespace,
            threadiness,
            serializer,
            wait_for_crds,
            print_crds,
        })
    }
}

fn parse_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> Result<bool> {
    match lookup(key) {
        Some(v) => v
            .parse()
            .with_context(|| format!("{} must be true or false, got {}", key, v)),
        None => Ok(default),
    }
}
