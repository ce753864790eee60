use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::View;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeView {
    pub id: i32,
    pub name: String,
    pub value: String,
}

impl View for AttributeView {
    const KIND: &'static str = "attribute";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterView {
    pub id: i32,
    pub name: String,
    pub attributes: Vec<AttributeView>,
}

impl View for ClusterView {
    const KIND: &'static str = "cluster";
}

/// A cluster as seen from the cluster list: the summary plus its hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterHostsView {
    #[serde(flatten)]
    pub cluster: ClusterView,
    pub hosts: Vec<HostView>,
}

impl View for ClusterHostsView {
    const KIND: &'static str = "cluster_hosts";
}

/// Everything observed across a cluster's hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDetailView {
    #[serde(flatten)]
    pub cluster: ClusterView,
    pub hosts: Vec<HostView>,
    pub deployments: Vec<DeploymentView>,
    pub applications: Vec<ApplicationView>,
    pub services: Vec<ServiceView>,
    /// Deployment name to the applications reported under it.
    pub deployment_applications: BTreeMap<String, Vec<ApplicationView>>,
}

impl View for ClusterDetailView {
    const KIND: &'static str = "cluster_detail";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostView {
    pub id: i32,
    pub name: String,
    pub label: Option<String>,
    pub attributes: Vec<AttributeView>,
}

impl View for HostView {
    const KIND: &'static str = "host";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDetailView {
    #[serde(flatten)]
    pub host: HostView,
    pub cluster: Option<ClusterView>,
    pub services: Vec<ServiceView>,
}

impl View for HostDetailView {
    const KIND: &'static str = "host_detail";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationView {
    pub id: i32,
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub attributes: Vec<AttributeView>,
}

impl View for ApplicationView {
    const KIND: &'static str = "application";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDetailView {
    #[serde(flatten)]
    pub application: ApplicationView,
    pub components: Vec<ComponentView>,
}

impl View for ApplicationDetailView {
    const KIND: &'static str = "application_detail";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionView {
    pub id: i32,
    pub name: String,
}

impl View for VersionView {
    const KIND: &'static str = "version";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDetailView {
    #[serde(flatten)]
    pub version: VersionView,
    pub components: Vec<ComponentView>,
    pub services: Vec<ServiceView>,
}

impl View for VersionDetailView {
    const KIND: &'static str = "version_detail";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentView {
    pub id: i32,
    pub name: String,
    pub label: Option<String>,
}

impl View for DeploymentView {
    const KIND: &'static str = "deployment";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentDetailView {
    #[serde(flatten)]
    pub deployment: DeploymentView,
    pub services: Vec<ServiceView>,
    pub customers: Vec<CustomerView>,
}

impl View for DeploymentDetailView {
    const KIND: &'static str = "deployment_detail";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentView {
    pub id: i32,
    pub application: ApplicationView,
    pub version: VersionView,
}

impl View for ComponentView {
    const KIND: &'static str = "component";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceView {
    pub id: i32,
    /// RFC 3339 timestamp of the last report.
    pub updated: String,
    pub arguments: Option<String>,
    pub host: HostView,
    pub deployment: DeploymentView,
    pub component: ComponentView,
}

impl View for ServiceView {
    const KIND: &'static str = "service";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerView {
    pub id: i32,
    pub name: String,
    pub attributes: Vec<AttributeView>,
}

impl View for CustomerView {
    const KIND: &'static str = "customer";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetailView {
    #[serde(flatten)]
    pub customer: CustomerView,
    pub deployments: Vec<DeploymentView>,
}

impl View for CustomerDetailView {
    const KIND: &'static str = "customer_detail";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseView {
    pub id: i32,
    pub name: String,
    pub attributes: Vec<AttributeView>,
}

impl View for ReleaseView {
    const KIND: &'static str = "release";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDetailView {
    #[serde(flatten)]
    pub release: ReleaseView,
    pub services: Vec<ServiceView>,
}

impl View for ReleaseDetailView {
    const KIND: &'static str = "release_detail";
}
