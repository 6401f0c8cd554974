//! Reading and changing the environment variables of a deployed app.
//!
//! Every operation is a read-modify-write of the whole serving `Service`:
//! look the app up, change the container env list in memory, replace the
//! object. Nothing is retried here.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    future::Future,
};

use k8s_openapi::api::core::v1::EnvVar;
use k8s_util::{
    build_env::{service_env_mut, service_get_env},
    serving::Service,
};
use log::{debug, info};

use crate::{
    error::{Error, Result},
    options::{EnvOptions, DEFAULT_NAMESPACE},
};

/// Which apps to list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppFilter {
    pub namespace: String,
    pub app_name: String,
}

/// Resolves a namespace and app name to the matching services.
pub trait AppLister {
    fn list(
        &self,
        filter: &AppFilter,
    ) -> impl Future<Output = kube::Result<Vec<Service>>> + Send;
}

/// Produces a handle that can write services back.
pub trait ServingFactory {
    type Client: ServingClient;

    fn create(&self) -> impl Future<Output = kube::Result<Self::Client>> + Send;
}

pub trait ServingClient {
    fn update(
        &self,
        namespace: &str,
        service: &Service,
    ) -> impl Future<Output = kube::Result<Service>> + Send;
}

pub struct EnvironmentClient<L, F> {
    lister: L,
    factory: F,
    default_namespace: String,
}

impl<L: AppLister, F: ServingFactory> EnvironmentClient<L, F> {
    pub fn new(lister: L, factory: F) -> Self {
        EnvironmentClient {
            lister,
            factory,
            default_namespace: DEFAULT_NAMESPACE.to_owned(),
        }
    }

    /// Namespace used for calls whose options don't name one.
    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    /// Fetches the env vars of an app. When a name occurs more than once the
    /// last entry wins. Entries without a literal value list as empty.
    pub async fn list(
        &self,
        app_name: &str,
        opts: &EnvOptions,
    ) -> Result<BTreeMap<String, String>> {
        check_app_name(app_name)?;
        let namespace = opts.resolve_namespace(&self.default_namespace);

        let service = self.fetch_service(namespace, app_name).await?;
        Ok(env_to_map(service_get_env(&service)))
    }

    /// Adds or overwrites env vars of an app. Given values take precedence
    /// over existing ones with the same name.
    pub async fn set(
        &self,
        app_name: &str,
        values: &BTreeMap<String, String>,
        opts: &EnvOptions,
    ) -> Result<()> {
        check_app_name(app_name)?;
        let namespace = opts.resolve_namespace(&self.default_namespace);

        let client = self.factory.create().await.map_err(Error::Factory)?;
        let mut service = self.fetch_service(namespace, app_name).await?;

        let env = service_env_mut(&mut service);
        *env = merge_env(std::mem::take(env), values);

        info!(
            "setting {} env var(s) on app '{}' in '{}'",
            values.len(),
            app_name,
            namespace
        );
        update_service(&client, namespace, app_name, &service).await
    }

    /// Removes env vars of an app. Names that aren't set are ignored.
    pub async fn unset(
        &self,
        app_name: &str,
        names: &[String],
        opts: &EnvOptions,
    ) -> Result<()> {
        check_app_name(app_name)?;
        let namespace = opts.resolve_namespace(&self.default_namespace);

        let client = self.factory.create().await.map_err(Error::Factory)?;
        let mut service = self.fetch_service(namespace, app_name).await?;

        let env = service_env_mut(&mut service);
        *env = remove_env(std::mem::take(env), names);

        info!(
            "unsetting {} env var(s) on app '{}' in '{}'",
            names.len(),
            app_name,
            namespace
        );
        update_service(&client, namespace, app_name, &service).await
    }

    async fn fetch_service(&self, namespace: &str, app_name: &str) -> Result<Service> {
        let filter = AppFilter {
            namespace: namespace.to_owned(),
            app_name: app_name.to_owned(),
        };
        let mut services = self.lister.list(&filter).await.map_err(Error::Fetch)?;
        debug!("{} service(s) match {:?}", services.len(), filter);

        let service = match services.pop() {
            Some(service) if services.is_empty() => service,
            popped => {
                return Err(Error::UnknownApp {
                    name: filter.app_name,
                    namespace: filter.namespace,
                    matches: services.len() + usize::from(popped.is_some()),
                })
            }
        };

        if let Some(mode) = service.spec.other_mode() {
            return Err(Error::UnsupportedMode {
                name: filter.app_name,
                mode,
            });
        }
        Ok(service)
    }
}

async fn update_service<C: ServingClient>(
    client: &C,
    namespace: &str,
    app_name: &str,
    service: &Service,
) -> Result<()> {
    client
        .update(namespace, service)
        .await
        .map_err(|err| Error::from_update(app_name, err))?;
    Ok(())
}

fn check_app_name(app_name: &str) -> Result<()> {
    if app_name.is_empty() {
        return Err(Error::InvalidAppName);
    }
    Ok(())
}

fn env_to_map(env: &[EnvVar]) -> BTreeMap<String, String> {
    env.iter()
        .map(|var| (var.name.clone(), var.value.clone().unwrap_or_default()))
        .collect()
}

/// Collapses duplicate names (first position, last value), then overlays
/// `values`. Overlaid names keep their position, new names are appended.
fn merge_env(existing: Vec<EnvVar>, values: &BTreeMap<String, String>) -> Vec<EnvVar> {
    let mut merged: Vec<EnvVar> = Vec::with_capacity(existing.len() + values.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    let mut put = |var: EnvVar| match positions.get(&var.name).copied() {
        Some(idx) => merged[idx] = var,
        None => {
            positions.insert(var.name.clone(), merged.len());
            merged.push(var);
        }
    };

    for var in existing {
        put(var);
    }
    for (name, value) in values {
        put(EnvVar {
            name: name.clone(),
            value: Some(value.clone()),
            value_from: None,
        });
    }

    merged
}

/// Drops every entry whose name is in `names`, keeping the order of the rest.
fn remove_env(existing: Vec<EnvVar>, names: &[String]) -> Vec<EnvVar> {
    let remove: HashSet<&str> = names.iter().map(String::as_str).collect();
    existing
        .into_iter()
        .filter(|var| !remove.contains(var.name.as_str()))
        .collect()
}
