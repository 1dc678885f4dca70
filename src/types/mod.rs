// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource kinds of the terraform-operator.cattle.io/v1 group.

pub mod condition;
pub mod execution;
pub mod execution_run;
pub mod module;

pub use condition::Condition;
pub use execution::{Execution, ExecutionSpec, ExecutionStatus, Variables};
pub use execution_run::{ExecutionRun, ExecutionRunSpec, ExecutionRunStatus};
pub use module::{GitLocation, Module, ModuleSpec, ModuleStatus};

use crate::error::{Result, TerraformOperatorError};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::CustomResourceExt;

/// The CustomResourceDefinitions for every kind in the group
pub fn crds() -> Vec<CustomResourceDefinition> {
    vec![Module::crd(), Execution::crd(), ExecutionRun::crd()]
}

/// Render all CRDs as a multi-document YAML stream
pub fn crd_manifests() -> Result<String> {
    crds()
        .iter()
        .map(|crd| {
            serde_yaml::to_string(crd).map_err(|e| TerraformOperatorError::Manifest(e.to_string()))
        })
        .collect::<Result<Vec<_>>>()
        .map(|docs| docs.join("---\n"))
}
