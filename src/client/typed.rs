// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed accessors handed out by the client getters.

use crate::client::object::ObjectClient;
use crate::client::resource::TerraformResource;
use crate::client::{Client, Interface};
use crate::controllers::{Lifecycle, ResourceController};
use crate::error::Result;
use crate::types::{Execution, ExecutionRun, Module};
use futures::{Stream, StreamExt};
use kube::api::{DeleteParams, ListParams, ObjectList, Patch};
use kube::runtime::{reflector::Store, watcher};
use serde::Serialize;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

pub type ModuleInterface = TypedClient<Module>;
pub type ExecutionInterface = TypedClient<Execution>;
pub type ExecutionRunInterface = TypedClient<ExecutionRun>;

pub type ModuleController = ResourceController<Module>;
pub type ExecutionController = ResourceController<Execution>;
pub type ExecutionRunController = ResourceController<ExecutionRun>;

pub type ModuleClient = ResourceClient<Module>;
pub type ExecutionClient = ResourceClient<Execution>;
pub type ExecutionRunClient = ResourceClient<ExecutionRun>;

/// Access to one kind within one namespace, plus that namespace's controller
#[derive(Clone)]
pub struct TypedClient<K: TerraformResource> {
    namespace: String,
    client: Client,
    object_client: ObjectClient<K>,
}

impl<K: TerraformResource> TypedClient<K> {
    pub(crate) fn new(namespace: &str, client: Client) -> Self {
        let object_client = ObjectClient::new(
            namespace,
            client.rest_client().clone(),
            K::RESOURCE,
            K::RESOURCE.group_version_kind(),
        );
        Self {
            namespace: namespace.to_string(),
            client,
            object_client,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn object_client(&self) -> &ObjectClient<K> {
        &self.object_client
    }

    /// The controller for this kind and namespace. The first call creates it and
    /// registers it as a starter on the client.
    pub fn controller(&self) -> ResourceController<K> {
        self.client.controller_for::<K>(&self.namespace)
    }

    pub fn add_handler<F, Fut>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(Arc<K>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.controller().add_handler(name, handler);
    }

    pub fn add_lifecycle<L: Lifecycle<K>>(&self, name: impl Into<String>, lifecycle: L) {
        self.controller().add_lifecycle(name, lifecycle);
    }

    pub async fn create(&self, obj: &K) -> Result<K> {
        self.object_client.create(obj).await
    }

    pub async fn get(&self, name: &str) -> Result<K> {
        self.object_client.get(name).await
    }

    pub async fn get_namespaced(&self, namespace: &str, name: &str) -> Result<K> {
        self.object_client.get_namespaced(namespace, name).await
    }

    pub async fn update(&self, obj: &K) -> Result<K> {
        self.object_client.update(obj).await
    }

    pub async fn update_status(&self, obj: &K) -> Result<K> {
        self.object_client.update_status(obj).await
    }

    pub async fn patch<P: Serialize + Debug>(&self, name: &str, patch: &Patch<P>) -> Result<K> {
        self.object_client.patch(name, patch).await
    }

    pub async fn delete(&self, name: &str) -> Result<Option<K>> {
        self.object_client.delete(name).await
    }

    pub async fn delete_namespaced(&self, namespace: &str, name: &str) -> Result<Option<K>> {
        self.object_client.delete_namespaced(namespace, name).await
    }

    pub async fn delete_collection(&self, dp: &DeleteParams, lp: &ListParams) -> Result<Vec<K>> {
        self.object_client.delete_collection(dp, lp).await
    }

    pub async fn list(&self, lp: &ListParams) -> Result<ObjectList<K>> {
        self.object_client.list(lp).await
    }

    pub async fn list_namespaced(&self, namespace: &str, lp: &ListParams) -> Result<ObjectList<K>> {
        self.object_client.list_namespaced(namespace, lp).await
    }

    pub fn watch(
        &self,
        config: watcher::Config,
    ) -> impl Stream<Item = watcher::Result<watcher::Event<K>>> + Send {
        self.object_client.watch(config)
    }
}

/// All-namespace access to one kind. Every call names the namespace it acts on.
#[derive(Clone)]
pub struct ResourceClient<K: TerraformResource> {
    iface: TypedClient<K>,
}

impl<K: TerraformResource> ResourceClient<K> {
    pub(crate) fn new(iface: TypedClient<K>) -> Self {
        Self { iface }
    }

    pub fn interface(&self) -> &TypedClient<K> {
        &self.iface
    }

    pub async fn create(&self, obj: &K) -> Result<K> {
        self.iface.create(obj).await
    }

    pub async fn get(&self, namespace: &str, name: &str) -> Result<K> {
        self.iface.get_namespaced(namespace, name).await
    }

    pub async fn update(&self, obj: &K) -> Result<K> {
        self.iface.update(obj).await
    }

    pub async fn update_status(&self, obj: &K) -> Result<K> {
        self.iface.update_status(obj).await
    }

    pub async fn patch<P: Serialize + Debug>(
        &self,
        namespace: &str,
        name: &str,
        patch: &Patch<P>,
    ) -> Result<K> {
        self.iface
            .object_client()
            .patch_namespaced(namespace, name, patch)
            .await
    }

    pub async fn delete(&self, namespace: &str, name: &str) -> Result<Option<K>> {
        self.iface.delete_namespaced(namespace, name).await
    }

    pub async fn list(&self, namespace: &str, lp: &ListParams) -> Result<ObjectList<K>> {
        self.iface.list_namespaced(namespace, lp).await
    }

    /// Watch one namespace, or every namespace when `namespace` is empty
    pub fn watch(
        &self,
        namespace: &str,
        config: watcher::Config,
    ) -> impl Stream<Item = watcher::Result<watcher::Event<K>>> + Send {
        if namespace.is_empty() {
            self.iface.object_client().watch(config).left_stream()
        } else {
            self.iface
                .object_client()
                .watch_namespaced(namespace, config)
                .right_stream()
        }
    }

    /// Run `handler` on changes in every namespace
    pub fn on_change<F, Fut>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(Arc<K>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.iface.add_handler(name, handler);
    }

    pub fn on_lifecycle<L: Lifecycle<K>>(&self, name: impl Into<String>, lifecycle: L) {
        self.iface.add_lifecycle(name, lifecycle);
    }

    /// Cache of the all-namespace controller
    pub fn cache(&self) -> Store<K> {
        self.iface.controller().cache().clone()
    }
}
