//! Builder for mocks pre-populated from YAML fixtures

use crate::label_selector::{matches_label_selector, selector_from_labels};
use crate::mock::ClientMock;
use crate::{Error, Result};
use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{Namespace, Pod, Service};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::version::Info;
use kube::core::SelectorExt;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Builder for creating mocks that answer from a set of known objects
///
/// Fixture objects are registered as stub responses when the mock is built:
/// - singular getters answer for `(namespace, name)` of each object
/// - listers answer for any namespace, filtered by namespace and label selector
///
/// Anything a fixture does not cover stays unconfigured and panics when called.
///
/// # Example
///
/// ```rust,no_run
/// use istio_kube_mock::ClientMockBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let k8s = ClientMockBuilder::new()
///     .with_openshift(false)
///     .with_fixture_dir("fixtures")
///     .load_fixture("bookinfo.yaml")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientMockBuilder {
    objects: Vec<Value>,
    fixture_dir: Option<PathBuf>,
    openshift: bool,
    maistra_api: bool,
    server_version: Option<Info>,
}

#[derive(Default)]
struct Objects {
    pods: Vec<Pod>,
    services: Vec<Service>,
    namespaces: Vec<Namespace>,
    deployments: Vec<Deployment>,
    stateful_sets: Vec<StatefulSet>,
}

impl ClientMockBuilder {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            fixture_dir: None,
            openshift: true,
            maistra_api: false,
            server_version: None,
        }
    }

    /// Report an OpenShift cluster (the default) or plain Kubernetes
    pub fn with_openshift(mut self, openshift: bool) -> Self {
        self.openshift = openshift;
        self
    }

    pub fn with_maistra_api(mut self, maistra_api: bool) -> Self {
        self.maistra_api = maistra_api;
        self
    }

    pub fn with_server_version(mut self, version: Info) -> Self {
        self.server_version = Some(version);
        self
    }

    /// Add a single object in its JSON form
    ///
    /// Like fixture documents, it is placed in `default` when it has no namespace.
    pub fn with_object(mut self, object: Value) -> Self {
        self.objects.push(object);
        self
    }

    /// Base directory for relative `load_fixture` paths
    pub fn with_fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = Some(dir.into());
        self
    }

    /// Load objects from a single- or multi-document YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a document is not valid YAML.
    pub fn load_fixture(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let fixture_path = match &self.fixture_dir {
            Some(dir) => dir.join(path),
            None => path.as_ref().to_path_buf(),
        };

        let content = std::fs::read_to_string(&fixture_path).map_err(|e| {
            Error::Internal(format!(
                "Failed to read fixture file {:?}: {}",
                fixture_path, e
            ))
        })?;

        let mut loaded = 0;
        for document in serde_yaml::Deserializer::from_str(&content) {
            let mut value = Value::deserialize(document).map_err(|e| {
                Error::Serialization(format!("Failed to parse YAML in {:?}: {}", fixture_path, e))
            })?;
            if value.is_null() {
                continue;
            }
            self.objects.push(value);
            loaded += 1;
        }
        debug!(path = ?fixture_path, loaded, "loaded fixture");

        Ok(self)
    }

    /// Load several fixture files in order
    pub fn load_fixtures<P>(mut self, paths: impl IntoIterator<Item = P>) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        for path in paths {
            self = self.load_fixture(path)?;
        }
        Ok(self)
    }

    /// # Panics
    ///
    /// Panics if the fixture file cannot be loaded or parsed.
    pub fn load_fixture_or_panic(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match self.load_fixture(&path) {
            Ok(builder) => builder,
            Err(e) => panic!("Failed to load fixture {:?}: {}", path, e),
        }
    }

    /// Build the mock and register responses for every loaded object
    ///
    /// Objects without a namespace are placed in `default`, except namespaces
    /// themselves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for objects of an unsupported kind or
    /// without a name, and [`Error::Serialization`] for malformed objects.
    pub fn build(self) -> Result<ClientMock> {
        let mock = ClientMock::default();
        mock.is_openshift.returns((), self.openshift);
        mock.is_maistra_api.returns((), self.maistra_api);
        if let Some(version) = self.server_version {
            mock.get_server_version.returns((), Ok(version));
        }

        let mut objects = Objects::default();
        for mut value in self.objects {
            default_namespace(&mut value);
            let kind = value
                .get("kind")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::InvalidRequest("Missing kind".to_string()))?
                .to_string();
            match kind.as_str() {
                "Pod" => objects.pods.push(decode(value)?),
                "Service" => objects.services.push(decode(value)?),
                "Namespace" => objects.namespaces.push(decode(value)?),
                "Deployment" => objects.deployments.push(decode(value)?),
                "StatefulSet" => objects.stateful_sets.push(decode(value)?),
                other => {
                    return Err(Error::InvalidRequest(format!(
                        "unsupported fixture kind: {other}"
                    )))
                }
            }
        }

        register(&mock, objects)?;
        Ok(mock)
    }
}

impl Default for ClientMockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_namespace(value: &mut Value) {
    if value.get("kind").and_then(Value::as_str) == Some("Namespace") {
        return;
    }
    if let Some(metadata) = value.get_mut("metadata").and_then(Value::as_object_mut) {
        let namespace = metadata.entry("namespace").or_insert(Value::Null);
        if namespace.is_null() {
            *namespace = Value::String("default".to_string());
        }
    }
}

fn decode<K: DeserializeOwned>(value: Value) -> Result<K> {
    Ok(serde_json::from_value(value)?)
}

fn identity(meta: &ObjectMeta) -> Result<(String, String)> {
    let name = meta
        .name
        .clone()
        .ok_or_else(|| Error::InvalidRequest("fixture object without a name".to_string()))?;
    Ok((meta.namespace.clone().unwrap_or_default(), name))
}

fn in_namespace<K>(objects: &[K], namespace: &str) -> Vec<K>
where
    K: Resource + Clone,
{
    objects
        .iter()
        .filter(|o| o.meta().namespace.as_deref() == Some(namespace))
        .cloned()
        .collect()
}

fn labelled<K>(objects: &[K], namespace: &str, selector: &str) -> Result<Vec<K>>
where
    K: Resource + Clone,
{
    let mut matched = Vec::new();
    for object in in_namespace(objects, namespace) {
        let labels = object.meta().labels.clone().unwrap_or_default();
        if matches_label_selector(&labels, selector)? {
            matched.push(object);
        }
    }
    Ok(matched)
}

fn register(mock: &ClientMock, objects: Objects) -> Result<()> {
    let Objects {
        pods,
        services,
        namespaces,
        deployments,
        stateful_sets,
    } = objects;

    for pod in &pods {
        mock.get_pod.returns(identity(&pod.metadata)?, Ok(pod.clone()));
    }
    for service in &services {
        mock.get_service
            .returns(identity(&service.metadata)?, Ok(service.clone()));
    }
    for namespace in &namespaces {
        let (_, name) = identity(&namespace.metadata)?;
        mock.get_namespace.returns(name, Ok(namespace.clone()));
    }
    for deployment in &deployments {
        mock.get_deployment
            .returns(identity(&deployment.metadata)?, Ok(deployment.clone()));
    }
    for stateful_set in &stateful_sets {
        mock.get_stateful_set
            .returns(identity(&stateful_set.metadata)?, Ok(stateful_set.clone()));
    }

    if !pods.is_empty() {
        mock.get_pods
            .respond_with(move |(ns, selector)| Some(labelled(&pods, ns, selector)));
    }
    if !services.is_empty() {
        // A service without a selector has its endpoints managed outside the
        // cluster, so it never selects a workload. An empty label map lists all.
        mock.get_services.respond_with(move |(ns, workload_labels)| {
            let selected: Vec<Service> = in_namespace(&services, ns)
                .into_iter()
                .filter(|svc| {
                    workload_labels.is_empty()
                        || svc
                            .spec
                            .as_ref()
                            .and_then(|spec| spec.selector.as_ref())
                            .is_some_and(|sel| {
                                !sel.is_empty() && selector_from_labels(sel).matches(workload_labels)
                            })
                })
                .collect();
            Some(Ok(selected))
        });
    }
    if !namespaces.is_empty() {
        mock.get_namespaces.respond_with(move |selector| {
            let mut matched = Vec::new();
            for namespace in &namespaces {
                let labels = namespace.metadata.labels.clone().unwrap_or_default();
                match matches_label_selector(&labels, selector) {
                    Ok(true) => matched.push(namespace.clone()),
                    Ok(false) => {}
                    Err(e) => return Some(Err(e)),
                }
            }
            Some(Ok(matched))
        });
    }
    if !deployments.is_empty() {
        let listed = deployments.clone();
        mock.get_deployments
            .respond_with(move |ns| Some(Ok(in_namespace(&listed, ns))));
        mock.get_deployments_by_label
            .respond_with(move |(ns, selector)| Some(labelled(&deployments, ns, selector)));
    }
    if !stateful_sets.is_empty() {
        mock.get_stateful_sets
            .respond_with(move |ns| Some(Ok(in_namespace(&stateful_sets, ns))));
    }

    Ok(())
}
