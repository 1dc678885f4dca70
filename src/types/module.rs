// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::READY_CONDITION;
use crate::types::condition::{self, Condition};
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A terraform module, either inline content or a git checkout
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "terraform-operator.cattle.io", version = "v1", kind = "Module")]
#[kube(namespaced)]
#[kube(status = "ModuleStatus")]
#[serde(rename_all = "camelCase")]
pub struct ModuleSpec {
    /// Inline files keyed by file name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, String>,
    #[serde(default)]
    pub git: GitLocation,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GitLocation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub branch: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub commit: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret_name: String,
    #[serde(default)]
    pub interval_seconds: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_checked: Option<GitLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl Module {
    pub fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.status
            .as_ref()
            .and_then(|s| condition::find(&s.conditions, condition_type))
    }

    pub fn is_ready(&self) -> bool {
        self.condition(READY_CONDITION).is_some_and(Condition::is_true)
    }

    /// A module with a git url is fetched, otherwise its inline content is used
    pub fn is_git(&self) -> bool {
        !self.spec.git.url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_git_module() {
        let module: Module = serde_yaml::from_str(
            r#"
apiVersion: terraform-operator.cattle.io/v1
kind: Module
metadata:
  name: network
  namespace: terraform
spec:
  git:
    url: https://github.com/example/network
    branch: main
    secretName: git-creds
    intervalSeconds: 300
"#,
        )
        .unwrap();

        assert!(module.is_git());
        assert_eq!(module.spec.git.branch, "main");
        assert_eq!(module.spec.git.secret_name, "git-creds");
        assert_eq!(module.spec.git.interval_seconds, 300);
        assert!(module.status.is_none());
    }

    #[test]
    fn test_inline_module_is_not_git() {
        let module = Module::new(
            "inline",
            ModuleSpec {
                content: BTreeMap::from([("main.tf".to_string(), "".to_string())]),
                ..Default::default()
            },
        );

        assert!(!module.is_git());
    }

    #[test]
    fn test_serialize_skips_empty_git_fields() {
        let spec = ModuleSpec {
            git: GitLocation {
                url: "https://example.com/repo".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"git": {"url": "https://example.com/repo", "intervalSeconds": 0}})
        );
    }

    #[test]
    fn test_is_ready() {
        let mut module = Module::new("m", ModuleSpec::default());
        assert!(!module.is_ready());

        module.status = Some(ModuleStatus {
            conditions: vec![Condition {
                condition_type: "Ready".to_string(),
                status: "True".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        });
        assert!(module.is_ready());
    }
}
