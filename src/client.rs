//! Cluster client contract used by the mesh observability backend

use crate::resources::{
    DeploymentConfig, IstioDetails, IstioObject, PodLogOptions, PodLogs, Project, RbacDetails,
    Route,
};
use crate::Result;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::authorization::v1::SelfSubjectAccessReview;
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{
    Endpoints, Namespace, Pod, ReplicationController, Service,
};
use k8s_openapi::apimachinery::pkg::version::Info;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Read/write access to Kubernetes, OpenShift and Istio resources
///
/// Label selectors are passed in their string form (`app=reviews,version!=v1`),
/// except for [`IstioClient::get_services`] which takes the selector labels of a
/// workload and returns the services that select it.
#[async_trait]
pub trait IstioClient: Send + Sync {
    // Mesh object writes
    async fn create_istio_object(
        &self,
        api: &str,
        namespace: &str,
        resource_type: &str,
        json: &str,
    ) -> Result<IstioObject>;
    async fn delete_istio_object(
        &self,
        api: &str,
        namespace: &str,
        object_type: &str,
        object_name: &str,
    ) -> Result<()>;
    async fn update_istio_object(
        &self,
        api: &str,
        namespace: &str,
        resource_type: &str,
        name: &str,
        json_patch: &str,
    ) -> Result<IstioObject>;

    // Workloads
    async fn get_cron_jobs(&self, namespace: &str) -> Result<Vec<CronJob>>;
    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment>;
    async fn get_deployments(&self, namespace: &str) -> Result<Vec<Deployment>>;
    async fn get_deployments_by_label(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<Deployment>>;
    async fn get_deployment_config(&self, namespace: &str, name: &str)
        -> Result<DeploymentConfig>;
    async fn get_deployment_configs(&self, namespace: &str) -> Result<Vec<DeploymentConfig>>;
    async fn get_jobs(&self, namespace: &str) -> Result<Vec<Job>>;
    async fn get_replica_sets(&self, namespace: &str) -> Result<Vec<ReplicaSet>>;
    async fn get_replication_controllers(
        &self,
        namespace: &str,
    ) -> Result<Vec<ReplicationController>>;
    async fn get_stateful_set(&self, namespace: &str, name: &str) -> Result<StatefulSet>;
    async fn get_stateful_sets(&self, namespace: &str) -> Result<Vec<StatefulSet>>;

    // Core resources
    async fn get_endpoints(&self, namespace: &str, service_name: &str) -> Result<Endpoints>;
    async fn get_namespace(&self, namespace: &str) -> Result<Namespace>;
    async fn get_namespaces(&self, label_selector: &str) -> Result<Vec<Namespace>>;
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod>;
    async fn get_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<Pod>>;
    async fn get_pod_logs(
        &self,
        namespace: &str,
        name: &str,
        opts: &PodLogOptions,
    ) -> Result<PodLogs>;
    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service>;
    async fn get_services(
        &self,
        namespace: &str,
        selector_labels: &BTreeMap<String, String>,
    ) -> Result<Vec<Service>>;

    // OpenShift
    async fn get_project(&self, project: &str) -> Result<Project>;
    async fn get_projects(&self, label_selector: &str) -> Result<Vec<Project>>;
    async fn get_route(&self, namespace: &str, name: &str) -> Result<Route>;

    // Networking
    async fn get_destination_rule(&self, namespace: &str, name: &str) -> Result<IstioObject>;
    async fn get_destination_rules(
        &self,
        namespace: &str,
        service_name: &str,
    ) -> Result<Vec<IstioObject>>;
    async fn get_gateway(&self, namespace: &str, name: &str) -> Result<IstioObject>;
    async fn get_gateways(&self, namespace: &str) -> Result<Vec<IstioObject>>;
    async fn get_istio_details(&self, namespace: &str, service_name: &str)
        -> Result<IstioDetails>;
    async fn get_service_entry(&self, namespace: &str, name: &str) -> Result<IstioObject>;
    async fn get_service_entries(&self, namespace: &str) -> Result<Vec<IstioObject>>;
    async fn get_sidecar(&self, namespace: &str, name: &str) -> Result<IstioObject>;
    async fn get_sidecars(&self, namespace: &str) -> Result<Vec<IstioObject>>;
    async fn get_virtual_service(&self, namespace: &str, name: &str) -> Result<IstioObject>;
    async fn get_virtual_services(
        &self,
        namespace: &str,
        service_name: &str,
    ) -> Result<Vec<IstioObject>>;

    // Mixer configuration
    async fn get_adapter(
        &self,
        namespace: &str,
        adapter_type: &str,
        name: &str,
    ) -> Result<IstioObject>;
    async fn get_adapters(&self, namespace: &str, label_selector: &str)
        -> Result<Vec<IstioObject>>;
    async fn get_istio_rule(&self, namespace: &str, name: &str) -> Result<IstioObject>;
    async fn get_istio_rules(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<IstioObject>>;
    async fn get_quota_spec(&self, namespace: &str, name: &str) -> Result<IstioObject>;
    async fn get_quota_specs(&self, namespace: &str) -> Result<Vec<IstioObject>>;
    async fn get_quota_spec_binding(&self, namespace: &str, name: &str) -> Result<IstioObject>;
    async fn get_quota_spec_bindings(&self, namespace: &str) -> Result<Vec<IstioObject>>;
    async fn get_template(
        &self,
        namespace: &str,
        template_type: &str,
        name: &str,
    ) -> Result<IstioObject>;
    async fn get_templates(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<IstioObject>>;

    // Authentication policies
    async fn get_mesh_policy(&self, name: &str) -> Result<IstioObject>;
    async fn get_mesh_policies(&self) -> Result<Vec<IstioObject>>;
    async fn get_policy(&self, namespace: &str, name: &str) -> Result<IstioObject>;
    async fn get_policies(&self, namespace: &str) -> Result<Vec<IstioObject>>;
    async fn get_service_mesh_policy(&self, namespace: &str, name: &str) -> Result<IstioObject>;
    async fn get_service_mesh_policies(&self, namespace: &str) -> Result<Vec<IstioObject>>;

    // Mesh RBAC
    async fn get_authorization_details(&self, namespace: &str) -> Result<RbacDetails>;
    async fn get_cluster_rbac_config(&self, name: &str) -> Result<IstioObject>;
    async fn get_cluster_rbac_configs(&self) -> Result<Vec<IstioObject>>;
    async fn get_rbac_config(&self, namespace: &str, name: &str) -> Result<IstioObject>;
    async fn get_rbac_configs(&self, namespace: &str) -> Result<Vec<IstioObject>>;
    async fn get_service_mesh_rbac_config(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<IstioObject>;
    async fn get_service_mesh_rbac_configs(&self, namespace: &str) -> Result<Vec<IstioObject>>;
    async fn get_service_role(&self, namespace: &str, name: &str) -> Result<IstioObject>;
    async fn get_service_roles(&self, namespace: &str) -> Result<Vec<IstioObject>>;
    async fn get_service_role_binding(&self, namespace: &str, name: &str)
        -> Result<IstioObject>;
    async fn get_service_role_bindings(&self, namespace: &str) -> Result<Vec<IstioObject>>;

    // Kubernetes RBAC
    async fn get_self_subject_access_review(
        &self,
        namespace: &str,
        api: &str,
        resource_type: &str,
        verbs: &[String],
    ) -> Result<Vec<SelfSubjectAccessReview>>;

    // Cluster capabilities
    async fn get_server_version(&self) -> Result<Info>;
    fn is_openshift(&self) -> bool;
    fn is_maistra_api(&self) -> bool;

    /// Release any background resources held by the client
    fn stop(&self);
}

/// Hands out a cluster client scoped to the caller's credentials
pub trait ClientFactory: Send + Sync {
    fn get_client(&self, token: &str) -> Result<Arc<dyn IstioClient>>;
}
