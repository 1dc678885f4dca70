// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace-bound CRUD and watch access to a single kind.

use crate::client::resource::{ResourceDescriptor, TerraformResource};
use crate::error::Result;
use futures::Stream;
use kube::{
    api::{DeleteParams, ListParams, ObjectList, Patch, PatchParams, PostParams},
    core::GroupVersionKind,
    runtime::watcher,
    Api, ResourceExt,
};
use serde::Serialize;
use tracing::{debug, instrument};

/// Performs requests for one kind against one namespace. An empty namespace
/// addresses all namespaces.
#[derive(Clone)]
pub struct ObjectClient<K: TerraformResource> {
    namespace: String,
    client: kube::Client,
    api: Api<K>,
    resource: &'static ResourceDescriptor,
    gvk: GroupVersionKind,
}

impl<K: TerraformResource> ObjectClient<K> {
    pub fn new(
        namespace: &str,
        client: kube::Client,
        resource: &'static ResourceDescriptor,
        gvk: GroupVersionKind,
    ) -> Self {
        let api = if namespace.is_empty() {
            Api::all(client.clone())
        } else {
            Api::namespaced(client.clone(), namespace)
        };

        Self {
            namespace: namespace.to_string(),
            client,
            api,
            resource,
            gvk,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn resource(&self) -> &'static ResourceDescriptor {
        self.resource
    }

    pub fn group_version_kind(&self) -> &GroupVersionKind {
        &self.gvk
    }

    pub fn api(&self) -> &Api<K> {
        &self.api
    }

    fn namespaced_api(&self, namespace: &str) -> Api<K> {
        Api::namespaced(self.client.clone(), namespace)
    }

    /// The client's own namespace wins, then the object's, then all namespaces
    fn api_for(&self, obj: &K) -> Api<K> {
        if !self.namespace.is_empty() {
            return self.api.clone();
        }
        match obj.namespace() {
            Some(ns) if !ns.is_empty() => self.namespaced_api(&ns),
            _ => self.api.clone(),
        }
    }

    #[instrument(skip(self, obj), fields(resource = self.resource.name, name = %obj.name_any()))]
    pub async fn create(&self, obj: &K) -> Result<K> {
        debug!("Creating {}", self.resource.singular_name);
        Ok(self.api_for(obj).create(&PostParams::default(), obj).await?)
    }

    #[instrument(skip(self), fields(resource = self.resource.name, namespace = %self.namespace))]
    pub async fn get(&self, name: &str) -> Result<K> {
        Ok(self.api.get(name).await?)
    }

    #[instrument(skip(self), fields(resource = self.resource.name))]
    pub async fn get_namespaced(&self, namespace: &str, name: &str) -> Result<K> {
        Ok(self.namespaced_api(namespace).get(name).await?)
    }

    /// Replace the object. Its resourceVersion guards against lost updates.
    #[instrument(skip(self, obj), fields(resource = self.resource.name, name = %obj.name_any()))]
    pub async fn update(&self, obj: &K) -> Result<K> {
        Ok(self
            .api_for(obj)
            .replace(&obj.name_any(), &PostParams::default(), obj)
            .await?)
    }

    /// Write the status subresource from `obj`. A `None` status clears the stored one.
    #[instrument(skip(self, obj), fields(resource = self.resource.name, name = %obj.name_any()))]
    pub async fn update_status(&self, obj: &K) -> Result<K> {
        let mut value = serde_json::to_value(obj).map_err(kube::Error::SerdeError)?;
        let status = value
            .get_mut("status")
            .map(serde_json::Value::take)
            .unwrap_or_default();

        Ok(self
            .api_for(obj)
            .patch_status(
                &obj.name_any(),
                &PatchParams::default(),
                &Patch::Merge(serde_json::json!({ "status": status })),
            )
            .await?)
    }

    #[instrument(skip(self, patch), fields(resource = self.resource.name, namespace = %self.namespace))]
    pub async fn patch<P: Serialize + std::fmt::Debug>(
        &self,
        name: &str,
        patch: &Patch<P>,
    ) -> Result<K> {
        Ok(self.api.patch(name, &PatchParams::default(), patch).await?)
    }

    #[instrument(skip(self, patch), fields(resource = self.resource.name))]
    pub async fn patch_namespaced<P: Serialize + std::fmt::Debug>(
        &self,
        namespace: &str,
        name: &str,
        patch: &Patch<P>,
    ) -> Result<K> {
        Ok(self
            .namespaced_api(namespace)
            .patch(name, &PatchParams::default(), patch)
            .await?)
    }

    /// Delete by name. Returns the object when its deletion is still pending.
    #[instrument(skip(self), fields(resource = self.resource.name, namespace = %self.namespace))]
    pub async fn delete(&self, name: &str) -> Result<Option<K>> {
        Ok(self
            .api
            .delete(name, &DeleteParams::default())
            .await?
            .map_left(Some)
            .map_right(|_| None)
            .into_inner())
    }

    #[instrument(skip(self), fields(resource = self.resource.name))]
    pub async fn delete_namespaced(&self, namespace: &str, name: &str) -> Result<Option<K>> {
        Ok(self
            .namespaced_api(namespace)
            .delete(name, &DeleteParams::default())
            .await?
            .map_left(Some)
            .map_right(|_| None)
            .into_inner())
    }

    #[instrument(skip(self, dp, lp), fields(resource = self.resource.name, namespace = %self.namespace))]
    pub async fn delete_collection(&self, dp: &DeleteParams, lp: &ListParams) -> Result<Vec<K>> {
        Ok(self
            .api
            .delete_collection(dp, lp)
            .await?
            .map_left(|list| list.items)
            .map_right(|_| Vec::new())
            .into_inner())
    }

    #[instrument(skip(self, lp), fields(resource = self.resource.name, namespace = %self.namespace))]
    pub async fn list(&self, lp: &ListParams) -> Result<ObjectList<K>> {
        Ok(self.api.list(lp).await?)
    }

    #[instrument(skip(self, lp), fields(resource = self.resource.name))]
    pub async fn list_namespaced(&self, namespace: &str, lp: &ListParams) -> Result<ObjectList<K>> {
        Ok(self.namespaced_api(namespace).list(lp).await?)
    }

    /// Watch for changes, relisting when the watch expires
    pub fn watch(
        &self,
        config: watcher::Config,
    ) -> impl Stream<Item = watcher::Result<watcher::Event<K>>> + Send {
        debug!("Watching {} in '{}'", self.resource.name, self.namespace);
        watcher(self.api.clone(), config)
    }

    pub fn watch_namespaced(
        &self,
        namespace: &str,
        config: watcher::Config,
    ) -> impl Stream<Item = watcher::Result<watcher::Event<K>>> + Send {
        debug!("Watching {} in '{}'", self.resource.name, namespace);
        watcher(self.namespaced_api(namespace), config)
    }
}
