// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerraformOperatorError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Invalid serializer media type: {0}")]
    InvalidSerializer(String),

    #[error("Context does not carry a {0}")]
    MissingContextValue(&'static str),

    #[error("Cache for {0} stopped before its initial list completed")]
    CacheSync(String),

    #[error("Lifecycle {name} failed: {message}")]
    Lifecycle { name: String, message: String },

    #[error("Failed to render CRD manifests: {0}")]
    Manifest(String),
}

pub type Result<T> = std::result::Result<T, TerraformOperatorError>;
