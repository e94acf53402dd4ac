//! Stub-backed implementation of [`IstioClient`]
//!
//! Every operation of the client contract has a public [`Stub`] field of the
//! same name on [`ClientMock`]. Configure it before exercising the code under
//! test, then inspect what was called:
//!
//! ```
//! use istio_kube_mock::{fixtures, ClientMock, IstioClient};
//!
//! # tokio_test::block_on(async {
//! let k8s = ClientMock::new();
//! k8s.get_service
//!     .returns(("bookinfo", "reviews"), Ok(fixtures::fake_service("bookinfo", "reviews")));
//!
//! let service = k8s.get_service("bookinfo", "reviews").await.unwrap();
//! assert_eq!(service.metadata.name.as_deref(), Some("reviews"));
//! assert!(k8s.get_service.was_called_with(("bookinfo", "reviews")));
//! # });
//! ```

use crate::client::IstioClient;
use crate::fixtures::fake_service;
use crate::resources::{
    DeploymentConfig, IstioDetails, IstioObject, PodLogOptions, PodLogs, Project, RbacDetails,
    Route,
};
use crate::stub::Stub;
use crate::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::authorization::v1::SelfSubjectAccessReview;
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{
    Endpoints, Namespace, Pod, ReplicationController, Service,
};
use k8s_openapi::apimachinery::pkg::version::Info;
use std::collections::BTreeMap;
use tracing::debug;

type Ns = String;
type NsName = (String, String);
type NsSelector = (String, String);
type NsKindName = (String, String, String);

macro_rules! stub_table {
    ($($op:ident: $args:ty => $out:ty;)*) => {
        /// Mock cluster client whose every answer is configured by the test
        ///
        /// Calls without a matching configuration panic. See [`Stub`] for how
        /// responses are resolved.
        pub struct ClientMock {
            $(pub $op: Stub<$args, $out>,)*
        }

        impl Default for ClientMock {
            /// A mock with nothing configured at all
            ///
            /// Unlike [`ClientMock::new`], even `is_openshift` panics until it
            /// is given a response.
            fn default() -> Self {
                Self {
                    $($op: Stub::new(stringify!($op)),)*
                }
            }
        }

        impl ClientMock {
            /// Forget every configured response and recorded call
            pub fn reset(&self) {
                $(self.$op.reset();)*
            }

            /// Operations that have been called at least once, in declaration order
            pub fn called_operations(&self) -> Vec<&'static str> {
                let mut called = Vec::new();
                $(
                    if self.$op.times_called() > 0 {
                        called.push(self.$op.operation());
                    }
                )*
                called
            }
        }
    };
}

stub_table! {
    create_istio_object: (String, String, String, String) => Result<IstioObject>;
    delete_istio_object: (String, String, String, String) => Result<()>;
    update_istio_object: (String, String, String, String, String) => Result<IstioObject>;

    get_cron_jobs: Ns => Result<Vec<CronJob>>;
    get_deployment: NsName => Result<Deployment>;
    get_deployments: Ns => Result<Vec<Deployment>>;
    get_deployments_by_label: NsSelector => Result<Vec<Deployment>>;
    get_deployment_config: NsName => Result<DeploymentConfig>;
    get_deployment_configs: Ns => Result<Vec<DeploymentConfig>>;
    get_jobs: Ns => Result<Vec<Job>>;
    get_replica_sets: Ns => Result<Vec<ReplicaSet>>;
    get_replication_controllers: Ns => Result<Vec<ReplicationController>>;
    get_stateful_set: NsName => Result<StatefulSet>;
    get_stateful_sets: Ns => Result<Vec<StatefulSet>>;

    get_endpoints: NsName => Result<Endpoints>;
    get_namespace: String => Result<Namespace>;
    get_namespaces: String => Result<Vec<Namespace>>;
    get_pod: NsName => Result<Pod>;
    get_pods: NsSelector => Result<Vec<Pod>>;
    get_pod_logs: (String, String, PodLogOptions) => Result<PodLogs>;
    get_service: NsName => Result<Service>;
    get_services: (String, BTreeMap<String, String>) => Result<Vec<Service>>;

    get_project: String => Result<Project>;
    get_projects: String => Result<Vec<Project>>;
    get_route: NsName => Result<Route>;

    get_destination_rule: NsName => Result<IstioObject>;
    get_destination_rules: NsName => Result<Vec<IstioObject>>;
    get_gateway: NsName => Result<IstioObject>;
    get_gateways: Ns => Result<Vec<IstioObject>>;
    get_istio_details: NsName => Result<IstioDetails>;
    get_service_entry: NsName => Result<IstioObject>;
    get_service_entries: Ns => Result<Vec<IstioObject>>;
    get_sidecar: NsName => Result<IstioObject>;
    get_sidecars: Ns => Result<Vec<IstioObject>>;
    get_virtual_service: NsName => Result<IstioObject>;
    get_virtual_services: NsName => Result<Vec<IstioObject>>;

    get_adapter: NsKindName => Result<IstioObject>;
    get_adapters: NsSelector => Result<Vec<IstioObject>>;
    get_istio_rule: NsName => Result<IstioObject>;
    get_istio_rules: NsSelector => Result<Vec<IstioObject>>;
    get_quota_spec: NsName => Result<IstioObject>;
    get_quota_specs: Ns => Result<Vec<IstioObject>>;
    get_quota_spec_binding: NsName => Result<IstioObject>;
    get_quota_spec_bindings: Ns => Result<Vec<IstioObject>>;
    get_template: NsKindName => Result<IstioObject>;
    get_templates: NsSelector => Result<Vec<IstioObject>>;

    get_mesh_policy: String => Result<IstioObject>;
    get_mesh_policies: () => Result<Vec<IstioObject>>;
    get_policy: NsName => Result<IstioObject>;
    get_policies: Ns => Result<Vec<IstioObject>>;
    get_service_mesh_policy: NsName => Result<IstioObject>;
    get_service_mesh_policies: Ns => Result<Vec<IstioObject>>;

    get_authorization_details: Ns => Result<RbacDetails>;
    get_cluster_rbac_config: String => Result<IstioObject>;
    get_cluster_rbac_configs: () => Result<Vec<IstioObject>>;
    get_rbac_config: NsName => Result<IstioObject>;
    get_rbac_configs: Ns => Result<Vec<IstioObject>>;
    get_service_mesh_rbac_config: NsName => Result<IstioObject>;
    get_service_mesh_rbac_configs: Ns => Result<Vec<IstioObject>>;
    get_service_role: NsName => Result<IstioObject>;
    get_service_roles: Ns => Result<Vec<IstioObject>>;
    get_service_role_binding: NsName => Result<IstioObject>;
    get_service_role_bindings: Ns => Result<Vec<IstioObject>>;

    get_self_subject_access_review: (String, String, String, Vec<String>)
        => Result<Vec<SelfSubjectAccessReview>>;

    get_server_version: () => Result<Info>;
    is_openshift: () => bool;
    is_maistra_api: () => bool;
}

impl ClientMock {
    /// A mock that reports an OpenShift cluster and nothing else
    ///
    /// Use [`ClientMock::default`] for a mock without the OpenShift answer.
    pub fn new() -> Self {
        let mock = Self::default();
        mock.is_openshift.returns((), true);
        mock
    }

    /// Every workload lister returns an empty list for `namespace`
    pub fn mock_empty_workloads(&self, namespace: &str) {
        debug!(namespace, "mocking empty workloads");
        self.get_deployments.returns(namespace, Ok(Vec::new()));
        self.get_replica_sets.returns(namespace, Ok(Vec::new()));
        self.get_replication_controllers
            .returns(namespace, Ok(Vec::new()));
        self.get_deployment_configs.returns(namespace, Ok(Vec::new()));
        self.get_stateful_sets.returns(namespace, Ok(Vec::new()));
        self.get_jobs.returns(namespace, Ok(Vec::new()));
        self.get_cron_jobs.returns(namespace, Ok(Vec::new()));
    }

    /// The named workload does not exist under any workload kind
    ///
    /// Singular getters for `(namespace, workload)` fail with
    /// [`Error::NotFound`]; the owner-resolving listers for `namespace` return
    /// empty lists.
    pub fn mock_empty_workload(&self, namespace: &str, workload: &str) {
        debug!(namespace, workload, "mocking missing workload");
        self.get_deployment.returns(
            (namespace, workload),
            Err(Error::not_found("Deployment", namespace, workload)),
        );
        self.get_stateful_set.returns(
            (namespace, workload),
            Err(Error::not_found("StatefulSet", namespace, workload)),
        );
        self.get_deployment_config.returns(
            (namespace, workload),
            Err(Error::not_found("DeploymentConfig", namespace, workload)),
        );
        self.get_replica_sets.returns(namespace, Ok(Vec::new()));
        self.get_replication_controllers
            .returns(namespace, Ok(Vec::new()));
        self.get_jobs.returns(namespace, Ok(Vec::new()));
        self.get_cron_jobs.returns(namespace, Ok(Vec::new()));
    }

    /// `get_service(namespace, name)` returns the canonical fake service
    pub fn mock_service(&self, namespace: &str, name: &str) {
        self.get_service
            .returns((namespace, name), Ok(fake_service(namespace, name)));
    }

    /// `get_services` in `namespace` returns fake services for `names`
    ///
    /// Any selector matches. Deployment lookups by label answer with an empty
    /// list by default so secondary lookups need no setup of their own.
    pub fn mock_services(&self, namespace: &str, names: &[&str]) {
        let services: Vec<Service> = names
            .iter()
            .map(|name| fake_service(namespace, name))
            .collect();
        let owner = namespace.to_string();
        self.get_services
            .returns_when(move |(ns, _)| *ns == owner, Ok(services));
        self.get_deployments_by_label
            .returns_by_default(Ok(Vec::new()));
    }
}

#[async_trait]
impl IstioClient for ClientMock {
    async fn create_istio_object(
        &self,
        api: &str,
        namespace: &str,
        resource_type: &str,
        json: &str,
    ) -> Result<IstioObject> {
        self.create_istio_object
            .call((api.into(), namespace.into(), resource_type.into(), json.into()))
    }

    async fn delete_istio_object(
        &self,
        api: &str,
        namespace: &str,
        object_type: &str,
        object_name: &str,
    ) -> Result<()> {
        self.delete_istio_object.call((
            api.into(),
            namespace.into(),
            object_type.into(),
            object_name.into(),
        ))
    }

    async fn update_istio_object(
        &self,
        api: &str,
        namespace: &str,
        resource_type: &str,
        name: &str,
        json_patch: &str,
    ) -> Result<IstioObject> {
        self.update_istio_object.call((
            api.into(),
            namespace.into(),
            resource_type.into(),
            name.into(),
            json_patch.into(),
        ))
    }

    async fn get_cron_jobs(&self, namespace: &str) -> Result<Vec<CronJob>> {
        self.get_cron_jobs.call(namespace.into())
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment> {
        self.get_deployment.call((namespace.into(), name.into()))
    }

    async fn get_deployments(&self, namespace: &str) -> Result<Vec<Deployment>> {
        self.get_deployments.call(namespace.into())
    }

    async fn get_deployments_by_label(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<Deployment>> {
        self.get_deployments_by_label
            .call((namespace.into(), label_selector.into()))
    }

    async fn get_deployment_config(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<DeploymentConfig> {
        self.get_deployment_config
            .call((namespace.into(), name.into()))
    }

    async fn get_deployment_configs(&self, namespace: &str) -> Result<Vec<DeploymentConfig>> {
        self.get_deployment_configs.call(namespace.into())
    }

    async fn get_jobs(&self, namespace: &str) -> Result<Vec<Job>> {
        self.get_jobs.call(namespace.into())
    }

    async fn get_replica_sets(&self, namespace: &str) -> Result<Vec<ReplicaSet>> {
        self.get_replica_sets.call(namespace.into())
    }

    async fn get_replication_controllers(
        &self,
        namespace: &str,
    ) -> Result<Vec<ReplicationController>> {
        self.get_replication_controllers.call(namespace.into())
    }

    async fn get_stateful_set(&self, namespace: &str, name: &str) -> Result<StatefulSet> {
        self.get_stateful_set.call((namespace.into(), name.into()))
    }

    async fn get_stateful_sets(&self, namespace: &str) -> Result<Vec<StatefulSet>> {
        self.get_stateful_sets.call(namespace.into())
    }

    async fn get_endpoints(&self, namespace: &str, service_name: &str) -> Result<Endpoints> {
        self.get_endpoints
            .call((namespace.into(), service_name.into()))
    }

    async fn get_namespace(&self, namespace: &str) -> Result<Namespace> {
        self.get_namespace.call(namespace.into())
    }

    async fn get_namespaces(&self, label_selector: &str) -> Result<Vec<Namespace>> {
        self.get_namespaces.call(label_selector.into())
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod> {
        self.get_pod.call((namespace.into(), name.into()))
    }

    async fn get_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<Pod>> {
        self.get_pods.call((namespace.into(), label_selector.into()))
    }

    async fn get_pod_logs(
        &self,
        namespace: &str,
        name: &str,
        opts: &PodLogOptions,
    ) -> Result<PodLogs> {
        self.get_pod_logs
            .call((namespace.into(), name.into(), opts.clone()))
    }

    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service> {
        self.get_service.call((namespace.into(), name.into()))
    }

    async fn get_services(
        &self,
        namespace: &str,
        selector_labels: &BTreeMap<String, String>,
    ) -> Result<Vec<Service>> {
        self.get_services
            .call((namespace.into(), selector_labels.clone()))
    }

    async fn get_project(&self, project: &str) -> Result<Project> {
        self.get_project.call(project.into())
    }

    async fn get_projects(&self, label_selector: &str) -> Result<Vec<Project>> {
        self.get_projects.call(label_selector.into())
    }

    async fn get_route(&self, namespace: &str, name: &str) -> Result<Route> {
        self.get_route.call((namespace.into(), name.into()))
    }

    async fn get_destination_rule(&self, namespace: &str, name: &str) -> Result<IstioObject> {
        self.get_destination_rule
            .call((namespace.into(), name.into()))
    }

    async fn get_destination_rules(
        &self,
        namespace: &str,
        service_name: &str,
    ) -> Result<Vec<IstioObject>> {
        self.get_destination_rules
            .call((namespace.into(), service_name.into()))
    }

    async fn get_gateway(&self, namespace: &str, name: &str) -> Result<IstioObject> {
        self.get_gateway.call((namespace.into(), name.into()))
    }

    async fn get_gateways(&self, namespace: &str) -> Result<Vec<IstioObject>> {
        self.get_gateways.call(namespace.into())
    }

    async fn get_istio_details(
        &self,
        namespace: &str,
        service_name: &str,
    ) -> Result<IstioDetails> {
        self.get_istio_details
            .call((namespace.into(), service_name.into()))
    }

    async fn get_service_entry(&self, namespace: &str, name: &str) -> Result<IstioObject> {
        self.get_service_entry.call((namespace.into(), name.into()))
    }

    async fn get_service_entries(&self, namespace: &str) -> Result<Vec<IstioObject>> {
        self.get_service_entries.call(namespace.into())
    }

    async fn get_sidecar(&self, namespace: &str, name: &str) -> Result<IstioObject> {
        self.get_sidecar.call((namespace.into(), name.into()))
    }

    async fn get_sidecars(&self, namespace: &str) -> Result<Vec<IstioObject>> {
        self.get_sidecars.call(namespace.into())
    }

    async fn get_virtual_service(&self, namespace: &str, name: &str) -> Result<IstioObject> {
        self.get_virtual_service
            .call((namespace.into(), name.into()))
    }

    async fn get_virtual_services(
        &self,
        namespace: &str,
        service_name: &str,
    ) -> Result<Vec<IstioObject>> {
        self.get_virtual_services
            .call((namespace.into(), service_name.into()))
    }

    async fn get_adapter(
        &self,
        namespace: &str,
        adapter_type: &str,
        name: &str,
    ) -> Result<IstioObject> {
        self.get_adapter
            .call((namespace.into(), adapter_type.into(), name.into()))
    }

    async fn get_adapters(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<IstioObject>> {
        self.get_adapters
            .call((namespace.into(), label_selector.into()))
    }

    async fn get_istio_rule(&self, namespace: &str, name: &str) -> Result<IstioObject> {
        self.get_istio_rule.call((namespace.into(), name.into()))
    }

    async fn get_istio_rules(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<IstioObject>> {
        self.get_istio_rules
            .call((namespace.into(), label_selector.into()))
    }

    async fn get_quota_spec(&self, namespace: &str, name: &str) -> Result<IstioObject> {
        self.get_quota_spec.call((namespace.into(), name.into()))
    }

    async fn get_quota_specs(&self, namespace: &str) -> Result<Vec<IstioObject>> {
        self.get_quota_specs.call(namespace.into())
    }

    async fn get_quota_spec_binding(&self, namespace: &str, name: &str) -> Result<IstioObject> {
        self.get_quota_spec_binding
            .call((namespace.into(), name.into()))
    }

    async fn get_quota_spec_bindings(&self, namespace: &str) -> Result<Vec<IstioObject>> {
        self.get_quota_spec_bindings.call(namespace.into())
    }

    async fn get_template(
        &self,
        namespace: &str,
        template_type: &str,
        name: &str,
    ) -> Result<IstioObject> {
        self.get_template
            .call((namespace.into(), template_type.into(), name.into()))
    }

    async fn get_templates(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<IstioObject>> {
        self.get_templates
            .call((namespace.into(), label_selector.into()))
    }

    async fn get_mesh_policy(&self, name: &str) -> Result<IstioObject> {
        self.get_mesh_policy.call(name.into())
    }

    async fn get_mesh_policies(&self) -> Result<Vec<IstioObject>> {
        self.get_mesh_policies.call(())
    }

    async fn get_policy(&self, namespace: &str, name: &str) -> Result<IstioObject> {
        self.get_policy.call((namespace.into(), name.into()))
    }

    async fn get_policies(&self, namespace: &str) -> Result<Vec<IstioObject>> {
        self.get_policies.call(namespace.into())
    }

    async fn get_service_mesh_policy(&self, namespace: &str, name: &str) -> Result<IstioObject> {
        self.get_service_mesh_policy
            .call((namespace.into(), name.into()))
    }

    async fn get_service_mesh_policies(&self, namespace: &str) -> Result<Vec<IstioObject>> {
        self.get_service_mesh_policies.call(namespace.into())
    }

    async fn get_authorization_details(&self, namespace: &str) -> Result<RbacDetails> {
        self.get_authorization_details.call(namespace.into())
    }

    async fn get_cluster_rbac_config(&self, name: &str) -> Result<IstioObject> {
        self.get_cluster_rbac_config.call(name.into())
    }

    async fn get_cluster_rbac_configs(&self) -> Result<Vec<IstioObject>> {
        self.get_cluster_rbac_configs.call(())
    }

    async fn get_rbac_config(&self, namespace: &str, name: &str) -> Result<IstioObject> {
        self.get_rbac_config.call((namespace.into(), name.into()))
    }

    async fn get_rbac_configs(&self, namespace: &str) -> Result<Vec<IstioObject>> {
        self.get_rbac_configs.call(namespace.into())
    }

    async fn get_service_mesh_rbac_config(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<IstioObject> {
        self.get_service_mesh_rbac_config
            .call((namespace.into(), name.into()))
    }

    async fn get_service_mesh_rbac_configs(&self, namespace: &str) -> Result<Vec<IstioObject>> {
        self.get_service_mesh_rbac_configs.call(namespace.into())
    }

    async fn get_service_role(&self, namespace: &str, name: &str) -> Result<IstioObject> {
        self.get_service_role.call((namespace.into(), name.into()))
    }

    async fn get_service_roles(&self, namespace: &str) -> Result<Vec<IstioObject>> {
        self.get_service_roles.call(namespace.into())
    }

    async fn get_service_role_binding(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<IstioObject> {
        self.get_service_role_binding
            .call((namespace.into(), name.into()))
    }

    async fn get_service_role_bindings(&self, namespace: &str) -> Result<Vec<IstioObject>> {
        self.get_service_role_bindings.call(namespace.into())
    }

    async fn get_self_subject_access_review(
        &self,
        namespace: &str,
        api: &str,
        resource_type: &str,
        verbs: &[String],
    ) -> Result<Vec<SelfSubjectAccessReview>> {
        self.get_self_subject_access_review.call((
            namespace.into(),
            api.into(),
            resource_type.into(),
            verbs.to_vec(),
        ))
    }

    async fn get_server_version(&self) -> Result<Info> {
        self.get_server_version.call(())
    }

    fn is_openshift(&self) -> bool {
        self.is_openshift.call(())
    }

    fn is_maistra_api(&self) -> bool {
        self.is_maistra_api.call(())
    }

    fn stop(&self) {}
}
