// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cache and handler controller for one resource kind in one namespace.

use crate::client::TerraformResource;
use crate::constants::{controller::ERROR_REQUEUE_SECS, FINALIZER_PREFIX};
use crate::context::Context;
use crate::controllers::Starter;
use crate::error::{Result, TerraformOperatorError};
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use kube::{
    runtime::{
        controller::{Action, Config as ControllerConfig},
        finalizer::{finalizer, Event as FinalizerEvent},
        watcher, Controller, WatchStreamExt,
    },
    Api, ResourceExt,
};
use kube_runtime::reflector::{self, store::Writer, ObjectRef, Store};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Callback invoked for every observed change of an object
pub type Handler<K> = Arc<dyn Fn(Arc<K>) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Create/update and removal hooks guarded by a finalizer
#[async_trait]
pub trait Lifecycle<K>: Send + Sync + 'static {
    async fn create_or_update(&self, obj: Arc<K>) -> Result<()>;

    /// Runs once when the object is being deleted, before the finalizer is released
    async fn remove(&self, obj: Arc<K>) -> Result<()>;
}

/// Watches one kind in one namespace (all namespaces when empty), keeps a cache
/// of it and runs the registered handlers on change.
pub struct ResourceController<K: TerraformResource> {
    inner: Arc<Inner<K>>,
}

impl<K: TerraformResource> Clone for ResourceController<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct Inner<K: TerraformResource> {
    name: String,
    namespace: String,
    client: kube::Client,
    api: Api<K>,
    handlers: Mutex<Vec<(String, Handler<K>)>>,
    cache: Store<K>,
    writer: Mutex<Option<Writer<K>>>,
    started: AtomicBool,
}

impl<K: TerraformResource> Inner<K> {
    fn handlers(&self) -> Vec<(String, Handler<K>)> {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<K: TerraformResource> ResourceController<K> {
    pub fn new(client: kube::Client, namespace: &str) -> Self {
        let api = if namespace.is_empty() {
            Api::all(client.clone())
        } else {
            Api::namespaced(client.clone(), namespace)
        };
        let name = if namespace.is_empty() {
            K::RESOURCE.name.to_string()
        } else {
            format!("{}/{}", K::RESOURCE.name, namespace)
        };
        let (cache, writer) = reflector::store();

        Self {
            inner: Arc::new(Inner {
                name,
                namespace: namespace.to_string(),
                client,
                api,
                handlers: Mutex::new(Vec::new()),
                cache,
                writer: Mutex::new(Some(writer)),
                started: AtomicBool::new(false),
            }),
        }
    }

    /// Name used in logs, e.g. `modules/terraform`
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// Objects observed so far. Only populated after `sync`.
    pub fn cache(&self) -> &Store<K> {
        &self.inner.cache
    }

    pub fn cached(&self, namespace: &str, name: &str) -> Option<Arc<K>> {
        self.inner
            .cache
            .get(&ObjectRef::new(name).within(namespace))
    }

    pub fn handler_names(&self) -> Vec<String> {
        self.inner
            .handlers()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    /// Register a handler. Handlers run in registration order and must be
    /// registered before `start` for the controller to run at all.
    pub fn add_handler<F, Fut>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(Arc<K>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let name = name.into();
        debug!("Adding handler {} to {}", name, self.inner.name);
        let handler: Handler<K> = Arc::new(move |obj| handler(obj).boxed());
        self.inner
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name, handler));
    }

    /// Register a lifecycle. A finalizer named after the lifecycle is added to
    /// every object so that `remove` runs before the object goes away.
    pub fn add_lifecycle<L>(&self, name: impl Into<String>, lifecycle: L)
    where
        L: Lifecycle<K>,
    {
        let name = name.into();
        let finalizer_name = finalizer_name(&name);
        let client = self.inner.client.clone();
        let lifecycle = Arc::new(lifecycle);
        let handler_name = name.clone();

        self.add_handler(handler_name, move |obj: Arc<K>| {
            let api: Api<K> = match obj.namespace() {
                Some(ns) => Api::namespaced(client.clone(), &ns),
                None => Api::all(client.clone()),
            };
            let lifecycle = lifecycle.clone();
            let finalizer_name = finalizer_name.clone();
            let name = name.clone();

            async move {
                finalizer(&api, &finalizer_name, obj, |event| async move {
                    match event {
                        FinalizerEvent::Apply(obj) => lifecycle.create_or_update(obj).await,
                        FinalizerEvent::Cleanup(obj) => lifecycle.remove(obj).await,
                    }
                    .map(|_| Action::await_change())
                })
                .await
                .map(|_| ())
                .map_err(|e| TerraformOperatorError::Lifecycle {
                    name,
                    message: e.to_string(),
                })
            }
        });
    }
}

fn finalizer_name(lifecycle: &str) -> String {
    format!("{}{}", FINALIZER_PREFIX, lifecycle)
}

#[async_trait]
impl<K: TerraformResource> Starter for ResourceController<K> {
    fn name(&self) -> &str {
        &self.inner.name
    }

    async fn sync(&self, ctx: &Context) -> Result<()> {
        let writer = self
            .inner
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(writer) = writer {
            debug!("Starting cache for {}", self.inner.name);
            let name = self.inner.name.clone();
            let token = ctx.cancellation_token().clone();
            let stream = watcher(self.inner.api.clone(), watcher::Config::default())
                .default_backoff();
            let events = reflector::reflector(writer, stream)
                .applied_objects()
                .for_each(move |res| {
                    let name = name.clone();
                    async move {
                        if let Err(e) = res {
                            warn!("Watch error for {}: {}", name, e);
                        }
                    }
                });
            let name = self.inner.name.clone();

            tokio::spawn(async move {
                tokio::select! {
                    _ = token.cancelled() => debug!("Cache for {} stopped", name),
                    _ = events => warn!("Watch for {} ended", name),
                }
            });
        }

        self.inner
            .cache
            .wait_until_ready()
            .await
            .map_err(|_| TerraformOperatorError::CacheSync(self.inner.name.clone()))?;
        debug!("Cache for {} synced", self.inner.name);
        Ok(())
    }

    async fn start(&self, ctx: &Context, threadiness: usize) -> Result<()> {
        self.sync(ctx).await?;

        if self.inner.started.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        if self.inner.handlers().is_empty() {
            debug!("No handlers for {}, only the cache runs", self.inner.name);
            return Ok(());
        }

        let concurrency = threadiness.clamp(1, u16::MAX as usize) as u16;
        let token = ctx.cancellation_token().clone();
        let name = self.inner.name.clone();
        let controller = Controller::new(self.inner.api.clone(), watcher::Config::default())
            .with_config(ControllerConfig::default().concurrency(concurrency))
            .run(reconcile::<K>, error_policy::<K>, self.inner.clone())
            .for_each(move |res| {
                let name = name.clone();
                async move {
                    match res {
                        Ok(o) => debug!("Reconciled {} {:?}", name, o),
                        Err(e) => warn!("Reconciliation error for {}: {:?}", name, e),
                    }
                }
            });

        info!(
            "Starting controller {} with {} workers",
            self.inner.name, concurrency
        );
        let name = self.inner.name.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => info!("Controller {} stopped", name),
                _ = controller => warn!("Controller {} ended", name),
            }
        });

        Ok(())
    }
}

async fn reconcile<K: TerraformResource>(obj: Arc<K>, inner: Arc<Inner<K>>) -> Result<Action> {
    debug!(
        "Reconciling {} {}/{}",
        inner.name,
        obj.namespace().unwrap_or_default(),
        obj.name_any()
    );

    for (name, handler) in inner.handlers() {
        if let Err(e) = handler(obj.clone()).await {
            error!("Handler {} failed for {}: {}", name, obj.name_any(), e);
            return Err(e);
        }
    }

    Ok(Action::await_change())
}

fn error_policy<K: TerraformResource>(
    _obj: Arc<K>,
    error: &TerraformOperatorError,
    inner: Arc<Inner<K>>,
) -> Action {
    error!("Reconciliation error for {}: {}", inner.name, error);
    Action::requeue(Duration::from_secs(ERROR_REQUEUE_SECS))
}
