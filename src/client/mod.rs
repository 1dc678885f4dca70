// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed client for the terraform-operator.cattle.io/v1 group.

pub mod object;
pub mod resource;
pub mod rest;
pub mod typed;

pub use object::ObjectClient;
pub use resource::{
    ControllerMap, ResourceDescriptor, TerraformResource, EXECUTION_RESOURCE,
    EXECUTION_RUN_RESOURCE, MODULE_RESOURCE,
};
pub use rest::RestConfig;
pub use typed::{
    ExecutionClient, ExecutionController, ExecutionInterface, ExecutionRunClient,
    ExecutionRunController, ExecutionRunInterface, ModuleClient, ModuleController,
    ModuleInterface, ResourceClient, TypedClient,
};

use crate::context::Context;
use crate::controllers::{self, ResourceController, Starter};
use crate::error::{Result, TerraformOperatorError};
use crate::types::{Execution, ExecutionRun, Module};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument};

pub trait ModulesGetter {
    fn modules(&self, namespace: &str) -> ModuleInterface;
}

pub trait ExecutionsGetter {
    fn executions(&self, namespace: &str) -> ExecutionInterface;
}

pub trait ExecutionRunsGetter {
    fn execution_runs(&self, namespace: &str) -> ExecutionRunInterface;
}

/// Everything the group client offers
pub trait Interface: Starter + ModulesGetter + ExecutionsGetter + ExecutionRunsGetter {
    fn rest_client(&self) -> &kube::Client;
}

/// All-namespace clients for every kind in the group
#[derive(Clone)]
pub struct Clients {
    pub module: ModuleClient,
    pub execution: ExecutionClient,
    pub execution_run: ExecutionRunClient,
}

/// Client for the group. Clones share the rest client, starters and controllers.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    rest_client: kube::Client,
    starters: Mutex<Vec<Arc<dyn Starter>>>,
    module_controllers: ControllerMap<Module>,
    execution_controllers: ControllerMap<Execution>,
    execution_run_controllers: ControllerMap<ExecutionRun>,
}

/// Build a client from a connection config. Defaults are applied to the
/// config passed in, never to the caller's copy.
#[instrument(skip(config), fields(cluster_url = %config.kube.cluster_url))]
pub fn new_for_config(config: RestConfig) -> Result<Client> {
    let kube_config = config.into_kube_config()?;
    let rest_client = kube::Client::try_from(kube_config)?;
    info!("Created client for {}/{}", crate::constants::GROUP, crate::constants::VERSION);
    Ok(new_for_client(rest_client))
}

/// Build a client on top of an existing transport
pub fn new_for_client(rest_client: kube::Client) -> Client {
    Client {
        inner: Arc::new(ClientInner {
            rest_client,
            starters: Mutex::new(Vec::new()),
            module_controllers: ControllerMap::default(),
            execution_controllers: ControllerMap::default(),
            execution_run_controllers: ControllerMap::default(),
        }),
    }
}

pub fn new_clients(config: RestConfig) -> Result<Clients> {
    let client = new_for_config(config)?;
    Ok(new_clients_from_interface(&client))
}

pub fn new_clients_from_interface(client: &Client) -> Clients {
    Clients {
        module: ResourceClient::new(client.modules("")),
        execution: ResourceClient::new(client.executions("")),
        execution_run: ResourceClient::new(client.execution_runs("")),
    }
}

impl Client {
    /// Registered starters in registration order
    pub fn starters(&self) -> Vec<Arc<dyn Starter>> {
        self.inner
            .starters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn ptr_eq(&self, other: &Client) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn controller_for<K: TerraformResource>(&self, namespace: &str) -> ResourceController<K> {
        let (controller, created) = K::controllers(self).get_or_insert_with(namespace, || {
            ResourceController::new(self.inner.rest_client.clone(), namespace)
        });

        if created {
            debug!("Registering controller {}", controller.name());
            self.inner
                .starters
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Arc::new(controller.clone()));
        }
        controller
    }
}

impl Interface for Client {
    fn rest_client(&self) -> &kube::Client {
        &self.inner.rest_client
    }
}

impl ModulesGetter for Client {
    fn modules(&self, namespace: &str) -> ModuleInterface {
        TypedClient::new(namespace, self.clone())
    }
}

impl ExecutionsGetter for Client {
    fn executions(&self, namespace: &str) -> ExecutionInterface {
        TypedClient::new(namespace, self.clone())
    }
}

impl ExecutionRunsGetter for Client {
    fn execution_runs(&self, namespace: &str) -> ExecutionRunInterface {
        TypedClient::new(namespace, self.clone())
    }
}

#[async_trait]
impl Starter for Client {
    async fn sync(&self, ctx: &Context) -> Result<()> {
        controllers::sync(ctx, &self.starters()).await
    }

    async fn start(&self, ctx: &Context, threadiness: usize) -> Result<()> {
        controllers::start(ctx, threadiness, &self.starters()).await
    }
}

#[derive(Clone)]
struct ClientKey(Client);

#[derive(Clone)]
struct ClientsKey(Arc<Clients>);

/// Build a client from `config` and derive a context that carries it and its
/// `Clients` bundle
pub fn factory(ctx: &Context, config: RestConfig) -> Result<(Context, Arc<dyn Starter>)> {
    let client = new_for_config(config)?;
    Ok(with_client(ctx, client))
}

/// Derive a context that carries `client` and its `Clients` bundle
pub fn with_client(ctx: &Context, client: Client) -> (Context, Arc<dyn Starter>) {
    let clients = Arc::new(new_clients_from_interface(&client));
    let ctx = ctx
        .with_value(ClientKey(client.clone()))
        .with_value(ClientsKey(clients));
    let starter: Arc<dyn Starter> = Arc::new(client);
    (ctx, starter)
}

/// The client stored by `factory` or `with_client`
pub fn from(ctx: &Context) -> Result<Client> {
    ctx.value::<ClientKey>()
        .map(|key| key.0.clone())
        .ok_or(TerraformOperatorError::MissingContextValue("terraform-operator client"))
}

/// The `Clients` bundle stored by `factory` or `with_client`
pub fn clients_from(ctx: &Context) -> Result<Arc<Clients>> {
    ctx.value::<ClientsKey>()
        .map(|key| key.0.clone())
        .ok_or(TerraformOperatorError::MissingContextValue("terraform-operator clients"))
}
