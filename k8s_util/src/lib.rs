//! Kubernetes plumbing for the kf tools: client creation, the Knative
//! serving `Service` resource and namespaced API handles.

use anyhow::Context as _;
use kube::{Client, Config};

pub mod apis;
pub mod build_env;
pub mod client;
pub mod serving;

/// Creates a client for the given kubeconfig context, or the inferred default.
/// The config is returned too, callers need its default namespace.
pub async fn create_client(k8s_context: Option<&str>) -> anyhow::Result<(Client, Config)> {
    let config = client::load_config(k8s_context).await?;
    let client = Client::try_from(config.clone()).context("attempting to get client")?;
    Ok((client, config))
}
