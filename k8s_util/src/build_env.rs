use k8s_openapi::api::core::v1::EnvVar;

use crate::serving::{Container, Service};

pub fn service_get_container(service: &Service) -> Option<&Container> {
    service
        .spec
        .run_latest
        .as_ref()?
        .configuration
        .as_ref()?
        .revision_template
        .as_ref()?
        .spec
        .as_ref()?
        .container
        .as_ref()
}

/// Env list of the service's container, empty if any part of the path is unset.
pub fn service_get_env(service: &Service) -> &[EnvVar] {
    service_get_container(service)
        .and_then(|container| container.env.as_deref())
        .unwrap_or(&[])
}

/// Mutable env list of the service's container. Missing intermediate objects
/// are created, so callers must reject services using another rollout mode
/// (see [`ServiceSpec::other_mode`](crate::serving::ServiceSpec::other_mode)).
pub fn service_env_mut(service: &mut Service) -> &mut Vec<EnvVar> {
    service
        .spec
        .run_latest
        .get_or_insert_with(Default::default)
        .configuration
        .get_or_insert_with(Default::default)
        .revision_template
        .get_or_insert_with(Default::default)
        .spec
        .get_or_insert_with(Default::default)
        .container
        .get_or_insert_with(Default::default)
        .env
        .get_or_insert_with(Default::default)
}
