// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context as _, Result};
use kube::ResourceExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use terraform_operator_client::client::{
    self, ExecutionRunsGetter, ExecutionsGetter, Interface, ModulesGetter, RestConfig,
};
use terraform_operator_client::config::Config;
use terraform_operator_client::context::Context;
use terraform_operator_client::kubernetes::wait_for_crds;
use terraform_operator_client::types::crd_manifests;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    if config.print_crds {
        print!("{}", crd_manifests()?);
        return Ok(());
    }

    info!(
        "Configuration loaded: namespace='{}' threadiness={}",
        config.namespace, config.threadiness
    );

    let mut rest_config = RestConfig::infer()
        .await
        .context("Failed to load Kubernetes configuration")?;
    rest_config.serializer = config.serializer.clone();

    let ctx = Context::new();
    let (ctx, starter) = client::factory(&ctx, rest_config)?;
    let terraform = client::from(&ctx)?;
    info!("Connected to Kubernetes cluster");

    if config.wait_for_crds {
        info!("Waiting for terraform-operator CRDs to become available...");
        wait_for_crds(terraform.rest_client()).await?;
    }

    terraform
        .modules(&config.namespace)
        .add_handler("log-modules", |module| async move {
            info!(
                "Module {}/{} ready={}",
                module.namespace().unwrap_or_default(),
                module.name_any(),
                module.is_ready()
            );
            Ok(())
        });
    terraform
        .executions(&config.namespace)
        .add_handler("log-executions", |execution| async move {
            info!(
                "Execution {}/{} module={} run={:?}",
                execution.namespace().unwrap_or_default(),
                execution.name_any(),
                execution.spec.module_name,
                execution.current_run()
            );
            Ok(())
        });
    terraform
        .execution_runs(&config.namespace)
        .add_handler("log-execution-runs", |run| async move {
            info!(
                "ExecutionRun {}/{} confirmed={}",
                run.namespace().unwrap_or_default(),
                run.name_any(),
                run.is_confirmed()
            );
            Ok(())
        });

    info!("Starting controllers...");
    starter.start(&ctx, config.threadiness).await?;

    tokio::signal::ctrl_c().await?;
    warn!("Interrupted, stopping controllers");
    ctx.cancel();
    Ok(())
}
