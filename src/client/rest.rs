// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Connection configuration for the API server.

use crate::constants::DEFAULT_SERIALIZER;
use crate::error::{Result, TerraformOperatorError};
use http::header::{HeaderValue, ACCEPT};

/// How to reach the API server and which media type to negotiate
#[derive(Clone, Debug)]
pub struct RestConfig {
    pub kube: kube::Config,
    /// Media type requested from the API server; `application/json` when unset
    pub serializer: Option<String>,
}

impl RestConfig {
    pub fn new(kube: kube::Config) -> Self {
        Self {
            kube,
            serializer: None,
        }
    }

    /// Load from the local kubeconfig or the in-cluster service account
    pub async fn infer() -> Result<Self> {
        let kube = kube::Config::infer()
            .await
            .map_err(|e| TerraformOperatorError::KubeError(kube::Error::InferConfig(e)))?;
        Ok(Self::new(kube))
    }

    pub fn with_serializer(mut self, serializer: impl Into<String>) -> Self {
        self.serializer = Some(serializer.into());
        self
    }

    /// Fill unset fields. A serializer that is already set is kept as is.
    pub fn with_defaults(mut self) -> Self {
        if self.serializer.is_none() {
            self.serializer = Some(DEFAULT_SERIALIZER.to_string());
        }
        self
    }

    /// Turn into a kube config that sends the serializer as the `Accept` header
    pub(crate) fn into_kube_config(self) -> Result<kube::Config> {
        let RestConfig {
            mut kube,
            serializer,
        } = self.with_defaults();
        let serializer = serializer.unwrap_or_else(|| DEFAULT_SERIALIZER.to_string());

        let value = HeaderValue::from_str(&serializer)
            .map_err(|_| TerraformOperatorError::InvalidSerializer(serializer.clone()))?;
        kube.headers.retain(|(name, _)| *name != ACCEPT);
        kube.headers.push((ACCEPT, value));
        Ok(kube)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config() -> RestConfig {
        RestConfig::new(kube::Config::new(
            "https://kubernetes.default.svc".parse().unwrap(),
        ))
    }

    #[test]
    fn test_with_defaults_sets_missing_serializer() {
        let config = make_config().with_defaults();
        assert_eq!(config.serializer.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_with_defaults_keeps_existing_serializer() {
        let config = make_config()
            .with_serializer("application/yaml")
            .with_defaults();
        assert_eq!(config.serializer.as_deref(), Some("application/yaml"));
    }

    #[test]
    fn test_into_kube_config_sets_accept_header() {
        let kube = make_config().into_kube_config().unwrap();

        let accept: Vec<_> = kube.headers.iter().filter(|(n, _)| *n == ACCEPT).collect();
        assert_eq!(accept.len(), 1);
        assert_eq!(accept[0].1, "application/json");
    }

    #[test]
    fn test_into_kube_config_replaces_previous_accept() {
        let mut config = make_config().with_serializer("application/json;stream=watch");
        config
            .kube
            .headers
            .push((ACCEPT, HeaderValue::from_static("text/plain")));

        let kube = config.into_kube_config().unwrap();
        let accept: Vec<_> = kube.headers.iter().filter(|(n, _)| *n == ACCEPT).collect();
        assert_eq!(accept.len(), 1);
        assert_eq!(accept[0].1, "application/json;stream=watch");
    }

    #[test]
    fn test_invalid_serializer() {
        let err = make_config()
            .with_serializer("application/json\n")
            .into_kube_config()
            .unwrap_err();

        assert!(matches!(err, TerraformOperatorError::InvalidSerializer(_)));
    }
}
