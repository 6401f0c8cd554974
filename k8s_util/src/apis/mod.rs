use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use kube::{
    api::{ListParams, PostParams},
    Api, Client, ResourceExt,
};
use log::debug;

use crate::serving::Service;

pub struct Cluster {
    pub client: Client,
    pub namespaces: Mutex<BTreeMap<String, Arc<Apis>>>,
}

impl Cluster {
    pub fn new(client: Client) -> Arc<Self> {
        Arc::new(Cluster {
            client,
            namespaces: Mutex::new(BTreeMap::new()),
        })
    }

    pub fn get_namespace(&self, ns: &str) -> Arc<Apis> {
        let mut nss = self.namespaces.lock().unwrap();
        if let Some(apis) = nss.get(ns).cloned() {
            apis
        } else {
            let apis = Arc::new(Apis::namespaced(&self.client, ns));
            nss.insert(ns.to_string(), apis.clone());
            apis
        }
    }
}

pub struct Apis {
    pub namespace: String,
    pub service: Api<Service>,
}

impl Apis {
    pub fn namespaced(client: &Client, namespace: &str) -> Self {
        Apis {
            namespace: namespace.to_string(),
            service: Api::namespaced(client.clone(), namespace),
        }
    }
}

/// Knative services
impl Apis {
    /// Lists the services whose name is exactly `name`. The API server does
    /// the filtering, so this is normally zero or one item.
    pub async fn find_services_by_name(&self, name: &str) -> kube::Result<Vec<Service>> {
        let field_selector = name_field_selector(name);
        let services = self
            .service
            .list(&ListParams::default().fields(&field_selector))
            .await?;

        debug!(
            "Services found for selector '{}' in '{}': {:?}",
            field_selector,
            self.namespace,
            services
                .items
                .iter()
                .map(|v| &v.metadata.name)
                .collect::<Vec<_>>()
        );

        Ok(services.items)
    }

    /// Writes the whole object back. The `resourceVersion` of the fetched
    /// object is sent along, so a stale write fails with 409.
    pub async fn replace_service(&self, service: &Service) -> kube::Result<Service> {
        let name = service.name_any();
        debug!(
            "Replacing service '{}' in '{}' at resource version {:?}",
            name, self.namespace, service.metadata.resource_version
        );
        self.service
            .replace(&name, &PostParams::default(), service)
            .await
    }
}

fn name_field_selector(name: &str) -> String {
    format!("metadata.name={}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_selector_matches_exact_name() {
        assert_eq!(name_field_selector("hello"), "metadata.name=hello");
    }
}
