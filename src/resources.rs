//! Resource types returned by the cluster client that `k8s-openapi` does not ship
//!
//! OpenShift kinds are declared as custom resources so they carry real
//! group/version/kind metadata. Mesh configuration objects are kept generic:
//! the client hands them around as `IstioObject` and callers read the spec.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const NETWORKING_API_VERSION: &str = "networking.istio.io/v1alpha3";
pub const CONFIG_API_VERSION: &str = "config.istio.io/v1alpha2";
pub const AUTHENTICATION_API_VERSION: &str = "authentication.istio.io/v1alpha1";
pub const RBAC_API_VERSION: &str = "rbac.istio.io/v1alpha1";

/// A mesh configuration object (virtual service, gateway, policy, rule, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IstioObject {
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub spec: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub status: Map<String, Value>,
}

impl IstioObject {
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            metadata: ObjectMeta {
                name: Some(name.into()),
                namespace: Some(namespace.into()),
                ..ObjectMeta::default()
            },
            spec: Map::new(),
            status: Map::new(),
        }
    }

    /// Set one top-level spec field
    pub fn with_spec_field(mut self, field: impl Into<String>, value: Value) -> Self {
        self.spec.insert(field.into(), value);
        self
    }

    /// Parse an object from its JSON document form
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }
}

/// Mesh routing configuration that applies to a single service
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IstioDetails {
    pub virtual_services: Vec<IstioObject>,
    pub destination_rules: Vec<IstioObject>,
    pub service_entries: Vec<IstioObject>,
    pub gateways: Vec<IstioObject>,
    pub sidecars: Vec<IstioObject>,
}

/// Mesh authorization configuration for a namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RbacDetails {
    pub cluster_rbac_configs: Vec<IstioObject>,
    pub service_mesh_rbac_configs: Vec<IstioObject>,
    pub service_roles: Vec<IstioObject>,
    pub service_role_bindings: Vec<IstioObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PodLogs {
    pub logs: String,
}

/// Options for reading container logs
///
/// Hashable, unlike `kube::api::LogParams`, so it can key a stubbed response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PodLogOptions {
    pub container: Option<String>,
    pub follow: bool,
    pub previous: bool,
    pub timestamps: bool,
    pub since_seconds: Option<i64>,
    pub tail_lines: Option<i64>,
    pub limit_bytes: Option<i64>,
}

impl From<&PodLogOptions> for kube::api::LogParams {
    fn from(opts: &PodLogOptions) -> Self {
        kube::api::LogParams {
            container: opts.container.clone(),
            follow: opts.follow,
            previous: opts.previous,
            timestamps: opts.timestamps,
            since_seconds: opts.since_seconds,
            tail_lines: opts.tail_lines,
            limit_bytes: opts.limit_bytes,
            ..kube::api::LogParams::default()
        }
    }
}

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "apps.openshift.io",
    version = "v1",
    kind = "DeploymentConfig",
    namespaced,
    status = "DeploymentConfigStatus",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfigSpec {
    pub replicas: i32,
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
    #[serde(default)]
    pub paused: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfigStatus {
    pub replicas: i32,
    pub available_replicas: i32,
    pub unavailable_replicas: i32,
}

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "route.openshift.io",
    version = "v1",
    kind = "Route",
    namespaced,
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub to: RouteTargetReference,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct RouteTargetReference {
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

// Projects are cluster scoped.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "project.openshift.io",
    version = "v1",
    kind = "Project",
    derive = "PartialEq",
    derive = "Default"
)]
pub struct ProjectSpec {
    #[serde(default)]
    pub finalizers: Vec<String>,
}
