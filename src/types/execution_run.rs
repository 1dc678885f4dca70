// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::READY_CONDITION;
use crate::types::condition::{self, Condition};
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single plan/apply run of an Execution
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "terraform-operator.cattle.io", version = "v1", kind = "ExecutionRun")]
#[kube(namespaced)]
#[kube(status = "ExecutionRunStatus")]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRunSpec {
    pub execution_name: String,
    #[serde(default)]
    pub execution_version: i32,
    #[serde(default)]
    pub auto_confirm: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_hash: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub run_hash: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRunStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_output: Option<String>,
    #[serde(default)]
    pub plan_confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_logs: Option<String>,
}

impl ExecutionRun {
    pub fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.status
            .as_ref()
            .and_then(|s| condition::find(&s.conditions, condition_type))
    }

    pub fn is_ready(&self) -> bool {
        self.condition(READY_CONDITION).is_some_and(Condition::is_true)
    }

    /// True once the plan was confirmed, either by hand or through auto confirm
    pub fn is_confirmed(&self) -> bool {
        self.spec.auto_confirm || self.status.as_ref().is_some_and(|s| s.plan_confirmed)
    }
}
