//! Collaborators backed by a real cluster.

use std::sync::Arc;

use k8s_util::{apis::Cluster, serving::Service};
use kube::{Client, Config};
use tokio::sync::OnceCell;

use crate::environment::{AppFilter, AppLister, ServingClient, ServingFactory};

pub struct KubeAppLister {
    cluster: Arc<Cluster>,
}

impl KubeAppLister {
    pub fn new(client: Client) -> Self {
        KubeAppLister {
            cluster: Cluster::new(client),
        }
    }
}

impl AppLister for KubeAppLister {
    async fn list(&self, filter: &AppFilter) -> kube::Result<Vec<Service>> {
        self.cluster
            .get_namespace(&filter.namespace)
            .find_services_by_name(&filter.app_name)
            .await
    }
}

/// Builds the client from the stored config on first use. Later handles
/// share it, along with its namespaced APIs.
pub struct KubeServingFactory {
    config: Config,
    cluster: OnceCell<Arc<Cluster>>,
}

impl KubeServingFactory {
    pub fn new(config: Config) -> Self {
        KubeServingFactory {
            config,
            cluster: OnceCell::new(),
        }
    }
}

impl ServingFactory for KubeServingFactory {
    type Client = KubeServingClient;

    async fn create(&self) -> kube::Result<KubeServingClient> {
        let cluster = self
            .cluster
            .get_or_try_init(|| async { Client::try_from(self.config.clone()).map(Cluster::new) })
            .await?;
        Ok(KubeServingClient {
            cluster: cluster.clone(),
        })
    }
}

pub struct KubeServingClient {
    cluster: Arc<Cluster>,
}

impl ServingClient for KubeServingClient {
    async fn update(&self, namespace: &str, service: &Service) -> kube::Result<Service> {
        self.cluster
            .get_namespace(namespace)
            .replace_service(service)
            .await
    }
}
