//! Canonical fake cluster objects
//!
//! Every builder is deterministic: the same input always yields the same object.

use crate::Result;
use k8s_openapi::api::core::v1::{Namespace, Pod, Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annotation the sidecar injector writes on every mesh-enabled pod
pub const SIDECAR_STATUS_ANNOTATION: &str = "sidecar.istio.io/status";

const FAKE_SIDECAR_STATUS: &str = "{\"version\":\"\",\"initContainers\":[\"istio-init\",\"enable-core-dump\"],\"containers\":[\"istio-proxy\"],\"volumes\":[\"istio-envoy\",\"istio-certs\"]}";

/// Decoded form of the sidecar status annotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidecarStatus {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub init_containers: Vec<String>,
    #[serde(default)]
    pub containers: Vec<String>,
    #[serde(default)]
    pub volumes: Vec<String>,
}

impl SidecarStatus {
    /// Read the sidecar status out of pod annotations
    ///
    /// Returns `Ok(None)` when the pod was never injected.
    pub fn from_annotations(annotations: &BTreeMap<String, String>) -> Result<Option<Self>> {
        annotations
            .get(SIDECAR_STATUS_ANNOTATION)
            .map(|raw| serde_json::from_str::<SidecarStatus>(raw).map_err(crate::Error::from))
            .transpose()
    }
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn http_port(port: i32) -> ServicePort {
    ServicePort {
        name: Some("http".to_string()),
        protocol: Some("TCP".to_string()),
        port,
        ..ServicePort::default()
    }
}

/// A `ClusterIP` service selecting `app=<name>` with two http ports
pub fn fake_service(namespace: &str, name: &str) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(string_map(&[("app", name)])),
            ..ObjectMeta::default()
        },
        spec: Some(ServiceSpec {
            cluster_ip: Some("fromservice".to_string()),
            type_: Some("ClusterIP".to_string()),
            selector: Some(string_map(&[("app", name)])),
            ports: Some(vec![http_port(3001), http_port(3000)]),
            ..ServiceSpec::default()
        }),
        status: None,
    }
}

/// Annotations of a pod that went through sidecar injection
pub fn fake_istio_annotations() -> BTreeMap<String, String> {
    string_map(&[(SIDECAR_STATUS_ANNOTATION, FAKE_SIDECAR_STATUS)])
}

fn fake_pod(
    name: &str,
    app: &str,
    version: &str,
    annotations: Option<BTreeMap<String, String>>,
) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(string_map(&[("app", app), ("version", version)])),
            annotations,
            ..ObjectMeta::default()
        },
        ..Pod::default()
    }
}

/// `reviews-v1`, `reviews-v2` and `httpbin-v1`, all with an injected sidecar
pub fn fake_pod_list() -> Vec<Pod> {
    vec![
        fake_pod("reviews-v1", "reviews", "v1", Some(fake_istio_annotations())),
        fake_pod("reviews-v2", "reviews", "v2", Some(fake_istio_annotations())),
        fake_pod("httpbin-v1", "httpbin", "v1", Some(fake_istio_annotations())),
    ]
}

/// Same pods as [`fake_pod_list`] without any annotations
pub fn fake_pod_list_without_sidecar() -> Vec<Pod> {
    vec![
        fake_pod("reviews-v1", "reviews", "v1", None),
        fake_pod("reviews-v2", "reviews", "v2", None),
        fake_pod("httpbin-v1", "httpbin", "v1", None),
    ]
}

pub fn fake_namespace(name: &str) -> Namespace {
    Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..ObjectMeta::default()
        },
        ..Namespace::default()
    }
}
