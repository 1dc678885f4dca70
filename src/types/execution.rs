// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::READY_CONDITION;
use crate::types::condition::{self, Condition};
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Desired application of a module with a set of variables
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "terraform-operator.cattle.io", version = "v1", kind = "Execution")]
#[kube(namespaced)]
#[kube(status = "ExecutionStatus")]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSpec {
    pub module_name: String,
    #[serde(default)]
    pub auto_confirm: bool,
    #[serde(default)]
    pub destroy_on_delete: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    #[serde(default)]
    pub variables: Variables,
}

/// ConfigMaps and Secrets that feed terraform variables
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Variables {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_config_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_secret_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secret_names: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_run_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_plan_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_hash: Option<String>,
}

impl Execution {
    pub fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.status
            .as_ref()
            .and_then(|s| condition::find(&s.conditions, condition_type))
    }

    pub fn is_ready(&self) -> bool {
        self.condition(READY_CONDITION).is_some_and(Condition::is_true)
    }

    /// Name of the run currently tracked for this execution
    pub fn current_run(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.execution_run_name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_variables() {
        let execution: Execution = serde_json::from_value(serde_json::json!({
            "apiVersion": "terraform-operator.cattle.io/v1",
            "kind": "Execution",
            "metadata": {"name": "cluster", "namespace": "terraform"},
            "spec": {
                "moduleName": "network",
                "autoConfirm": true,
                "variables": {
                    "secretNames": ["aws-creds"],
                    "envConfigNames": ["env"]
                }
            },
            "status": {"executionRunName": "cluster-run-1"}
        }))
        .unwrap();

        assert_eq!(execution.spec.module_name, "network");
        assert!(execution.spec.auto_confirm);
        assert!(!execution.spec.destroy_on_delete);
        assert_eq!(execution.spec.variables.secret_names, vec!["aws-creds"]);
        assert!(execution.spec.variables.config_names.is_empty());
        assert_eq!(execution.current_run(), Some("cluster-run-1"));
    }

    #[test]
    fn test_not_ready_when_condition_false() {
        let mut execution = Execution::new("e", ExecutionSpec::default());
        execution.status = Some(ExecutionStatus {
            conditions: vec![Condition {
                condition_type: "Ready".to_string(),
                status: "False".to_string(),
                message: Some("plan pending".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        });

        assert!(!execution.is_ready());
        assert_eq!(
            execution.condition("Ready").and_then(|c| c.message.as_deref()),
            Some("plan pending")
        );
    }
}
