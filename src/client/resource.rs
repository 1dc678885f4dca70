// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Static descriptions of the kinds in the group and their controller maps.

use crate::client::Client;
use crate::constants::{GROUP, VERSION};
use crate::controllers::ResourceController;
use crate::types::{Execution, ExecutionRun, Module};
use k8s_openapi::NamespaceResourceScope;
use kube::core::GroupVersionKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};

/// REST resource descriptor of a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Plural name used in request paths
    pub name: &'static str,
    pub singular_name: &'static str,
    pub kind: &'static str,
    pub namespaced: bool,
}

impl ResourceDescriptor {
    pub fn group_version_kind(&self) -> GroupVersionKind {
        GroupVersionKind::gvk(GROUP, VERSION, self.kind)
    }
}

pub const MODULE_RESOURCE: ResourceDescriptor = ResourceDescriptor {
    name: "modules",
    singular_name: "module",
    kind: "Module",
    namespaced: true,
};

pub const EXECUTION_RESOURCE: ResourceDescriptor = ResourceDescriptor {
    name: "executions",
    singular_name: "execution",
    kind: "Execution",
    namespaced: true,
};

pub const EXECUTION_RUN_RESOURCE: ResourceDescriptor = ResourceDescriptor {
    name: "executionruns",
    singular_name: "executionrun",
    kind: "ExecutionRun",
    namespaced: true,
};

/// A kind served by this group, with everything the typed clients need to know about it
pub trait TerraformResource:
    kube::Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    const RESOURCE: &'static ResourceDescriptor;

    /// The client's controllers for this kind, keyed by namespace
    fn controllers(client: &Client) -> &ControllerMap<Self>;
}

impl TerraformResource for Module {
    const RESOURCE: &'static ResourceDescriptor = &MODULE_RESOURCE;

    fn controllers(client: &Client) -> &ControllerMap<Self> {
        &client.inner.module_controllers
    }
}

impl TerraformResource for Execution {
    const RESOURCE: &'static ResourceDescriptor = &EXECUTION_RESOURCE;

    fn controllers(client: &Client) -> &ControllerMap<Self> {
        &client.inner.execution_controllers
    }
}

impl TerraformResource for ExecutionRun {
    const RESOURCE: &'static ResourceDescriptor = &EXECUTION_RUN_RESOURCE;

    fn controllers(client: &Client) -> &ControllerMap<Self> {
        &client.inner.execution_run_controllers
    }
}

/// Controllers of one kind, keyed by namespace
pub struct ControllerMap<K: TerraformResource> {
    controllers: Mutex<HashMap<String, ResourceController<K>>>,
}

impl<K: TerraformResource> Default for ControllerMap<K> {
    fn default() -> Self {
        Self {
            controllers: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: TerraformResource> ControllerMap<K> {
    pub fn get(&self, namespace: &str) -> Option<ResourceController<K>> {
        self.controllers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(namespace)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.controllers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the controller for `namespace`, creating it with `create` while the
    /// lock is held. The flag is true when the controller was just created.
    pub(crate) fn get_or_insert_with(
        &self,
        namespace: &str,
        create: impl FnOnce() -> ResourceController<K>,
    ) -> (ResourceController<K>, bool) {
        let mut controllers = self
            .controllers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = controllers.get(namespace) {
            return (existing.clone(), false);
        }

        let controller = create();
        controllers.insert(namespace.to_string(), controller.clone());
        (controller, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_matches_kube<K: TerraformResource>() {
        assert_eq!(K::RESOURCE.name, K::plural(&()).as_ref());
        assert_eq!(K::RESOURCE.kind, K::kind(&()).as_ref());
        assert_eq!(K::group(&()), GROUP);
        assert_eq!(K::version(&()), VERSION);
        assert!(K::RESOURCE.namespaced);
    }

    #[test]
    fn test_descriptors_match_derived_resources() {
        assert_matches_kube::<Module>();
        assert_matches_kube::<Execution>();
        assert_matches_kube::<ExecutionRun>();
    }

    #[test]
    fn test_group_version_kind() {
        let gvk = EXECUTION_RUN_RESOURCE.group_version_kind();
        assert_eq!(gvk.group, "terraform-operator.cattle.io");
        assert_eq!(gvk.version, "v1");
        assert_eq!(gvk.kind, "ExecutionRun");
    }
}
