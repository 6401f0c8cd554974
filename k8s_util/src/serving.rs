//! Typed view of the Knative `serving.knative.dev/v1alpha1` `Service`.
//!
//! Only the path down to the container env list is modelled. Everything else
//! is kept in `extra` maps so that a fetched object can be written back with
//! `replace` without dropping fields we don't know about.

use std::{borrow::Cow, collections::BTreeMap};

use k8s_openapi::{
    api::core::v1::EnvVar, apimachinery::pkg::apis::meta::v1::ObjectMeta, NamespaceResourceScope,
};
use kube::Resource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const GROUP: &str = "serving.knative.dev";
pub const VERSION: &str = "v1alpha1";
pub const KIND: &str = "Service";
pub const PLURAL: &str = "services";

/// Rollout modes other than `runLatest`. A spec carries exactly one mode.
pub const OTHER_MODES: [&str; 3] = ["release", "pinned", "manual"];

type Extra = BTreeMap<String, Value>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ServiceSpec,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Service {
    pub fn new(name: &str, namespace: &str) -> Self {
        Service {
            api_version: format!("{}/{}", GROUP, VERSION),
            kind: KIND.to_owned(),
            metadata: ObjectMeta {
                name: Some(name.to_owned()),
                namespace: Some(namespace.to_owned()),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

impl Resource for Service {
    type DynamicType = ();
    type Scope = NamespaceResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(KIND)
    }

    fn group(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(GROUP)
    }

    fn version(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(VERSION)
    }

    fn plural(_: &()) -> Cow<'_, str> {
        Cow::Borrowed(PLURAL)
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_latest: Option<RunLatest>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ServiceSpec {
    /// The rollout mode in use when it is not `runLatest`.
    pub fn other_mode(&self) -> Option<&'static str> {
        if self.run_latest.is_some() {
            return None;
        }
        OTHER_MODES
            .iter()
            .copied()
            .find(|mode| self.extra.contains_key(*mode))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunLatest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<ConfigurationSpec>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_template: Option<RevisionTemplate>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<RevisionSpec>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Knative allows the container name to be omitted, so this is not the
/// core/v1 `Container`. The env entries are plain core/v1 `EnvVar`s.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<EnvVar>>,
    #[serde(flatten)]
    pub extra: Extra,
}
