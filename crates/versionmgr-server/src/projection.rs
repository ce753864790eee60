//! Builds views out of store rows.
//!
//! Relations are loaded through whatever connection or transaction the caller
//! hands in, so a detail view never mixes two snapshots when the caller is
//! inside a transaction.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PrimaryKeyTrait, QueryFilter,
    QueryOrder,
};
use versionmgr_db::entities::{
    applications, clusters, components, customers, deployments, hosts, releases, services,
    versions,
};
use versionmgr_view::{
    ApplicationDetailView, ApplicationView, AttributeView, ClusterDetailView, ClusterHostsView,
    ClusterView, ComponentView, CustomerDetailView, CustomerView, DeploymentDetailView,
    DeploymentView, HostDetailView, HostView, ReleaseDetailView, ReleaseView, ServiceView,
    VersionDetailView, VersionView,
};

use crate::error::ApiError;
use crate::store::{AttributeOwner, attributes_of};

/// `GET /cluster`: every host exactly once, either under its cluster or in
/// `unclustered`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterListing {
    pub clusters: Vec<ClusterHostsView>,
    pub unclustered: Vec<HostView>,
}

async fn fetch<E, C>(conn: &C, kind: &'static str, id: i32) -> Result<E::Model, ApiError>
where
    C: ConnectionTrait,
    E: EntityTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    E::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(ApiError::NotFound { kind, id })
}

/// Views with an optional display label sort by label, then name. Unlabelled
/// rows go last.
trait Labelled {
    fn sort_key(&self) -> (Option<&str>, &str, i32);
}

impl Labelled for HostView {
    fn sort_key(&self) -> (Option<&str>, &str, i32) {
        (self.label.as_deref(), &self.name, self.id)
    }
}

impl Labelled for ApplicationView {
    fn sort_key(&self) -> (Option<&str>, &str, i32) {
        (self.label.as_deref(), &self.name, self.id)
    }
}

impl Labelled for DeploymentView {
    fn sort_key(&self) -> (Option<&str>, &str, i32) {
        (self.label.as_deref(), &self.name, self.id)
    }
}

fn compare_labelled<T: Labelled>(a: &T, b: &T) -> Ordering {
    let (a_label, a_name, a_id) = a.sort_key();
    let (b_label, b_name, b_id) = b.sort_key();
    let by_label = match (a_label, b_label) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_label
        .then_with(|| a_name.cmp(b_name))
        .then(a_id.cmp(&b_id))
}

fn sort_labelled<T: Labelled>(items: &mut [T]) {
    items.sort_by(compare_labelled);
}

async fn attribute_views<C>(conn: &C, owner: AttributeOwner) -> Result<Vec<AttributeView>, ApiError>
where
    C: ConnectionTrait,
{
    Ok(attributes_of(conn, owner)
        .await?
        .into_iter()
        .map(|a| AttributeView {
            id: a.id,
            name: a.name,
            value: a.value,
        })
        .collect())
}

pub async fn cluster_view<C>(conn: &C, m: clusters::Model) -> Result<ClusterView, ApiError>
where
    C: ConnectionTrait,
{
    Ok(ClusterView {
        attributes: attribute_views(conn, AttributeOwner::Cluster(m.id)).await?,
        id: m.id,
        name: m.name,
    })
}

pub async fn host_view<C>(conn: &C, m: hosts::Model) -> Result<HostView, ApiError>
where
    C: ConnectionTrait,
{
    Ok(HostView {
        attributes: attribute_views(conn, AttributeOwner::Host(m.id)).await?,
        id: m.id,
        name: m.name,
        label: m.label,
    })
}

pub async fn application_view<C>(conn: &C, m: applications::Model) -> Result<ApplicationView, ApiError>
where
    C: ConnectionTrait,
{
    Ok(ApplicationView {
        attributes: attribute_views(conn, AttributeOwner::Application(m.id)).await?,
        id: m.id,
        name: m.name,
        label: m.label,
        description: m.description,
    })
}

pub fn version_view(m: versions::Model) -> VersionView {
    VersionView {
        id: m.id,
        name: m.name,
    }
}

pub fn deployment_view(m: deployments::Model) -> DeploymentView {
    DeploymentView {
        id: m.id,
        name: m.name,
        label: m.label,
    }
}

pub async fn customer_view<C>(conn: &C, m: customers::Model) -> Result<CustomerView, ApiError>
where
    C: ConnectionTrait,
{
    Ok(CustomerView {
        attributes: attribute_views(conn, AttributeOwner::Customer(m.id)).await?,
        id: m.id,
        name: m.name,
    })
}

pub async fn release_view<C>(conn: &C, m: releases::Model) -> Result<ReleaseView, ApiError>
where
    C: ConnectionTrait,
{
    Ok(ReleaseView {
        attributes: attribute_views(conn, AttributeOwner::Release(m.id)).await?,
        id: m.id,
        name: m.name,
    })
}

pub async fn component_view<C>(conn: &C, m: components::Model) -> Result<ComponentView, ApiError>
where
    C: ConnectionTrait,
{
    let application = fetch::<applications::Entity, _>(conn, "application", m.application_id).await?;
    let version = fetch::<versions::Entity, _>(conn, "version", m.version_id).await?;
    Ok(ComponentView {
        id: m.id,
        application: application_view(conn, application).await?,
        version: version_view(version),
    })
}

/// Expands service rows, loading each referenced host, deployment and
/// component once.
#[derive(Default)]
struct ServiceLoader {
    hosts: HashMap<i32, HostView>,
    deployments: HashMap<i32, DeploymentView>,
    components: HashMap<i32, ComponentView>,
}

impl ServiceLoader {
    async fn host<C: ConnectionTrait>(&mut self, conn: &C, id: i32) -> Result<HostView, ApiError> {
        if let Some(v) = self.hosts.get(&id) {
            return Ok(v.clone());
        }
        let model = fetch::<hosts::Entity, _>(conn, "host", id).await?;
        let v = host_view(conn, model).await?;
        self.hosts.insert(id, v.clone());
        Ok(v)
    }

    async fn deployment<C: ConnectionTrait>(
        &mut self,
        conn: &C,
        id: i32,
    ) -> Result<DeploymentView, ApiError> {
        if let Some(v) = self.deployments.get(&id) {
            return Ok(v.clone());
        }
        let v = deployment_view(fetch::<deployments::Entity, _>(conn, "deployment", id).await?);
        self.deployments.insert(id, v.clone());
        Ok(v)
    }

    async fn component<C: ConnectionTrait>(
        &mut self,
        conn: &C,
        id: i32,
    ) -> Result<ComponentView, ApiError> {
        if let Some(v) = self.components.get(&id) {
            return Ok(v.clone());
        }
        let model = fetch::<components::Entity, _>(conn, "component", id).await?;
        let v = component_view(conn, model).await?;
        self.components.insert(id, v.clone());
        Ok(v)
    }

    async fn load<C: ConnectionTrait>(
        &mut self,
        conn: &C,
        m: services::Model,
    ) -> Result<ServiceView, ApiError> {
        Ok(ServiceView {
            id: m.id,
            updated: m.updated_at.to_rfc3339(),
            host: self.host(conn, m.host_id).await?,
            deployment: self.deployment(conn, m.deployment_id).await?,
            component: self.component(conn, m.component_id).await?,
            arguments: m.arguments,
        })
    }
}

pub async fn service_views<C>(conn: &C, rows: Vec<services::Model>) -> Result<Vec<ServiceView>, ApiError>
where
    C: ConnectionTrait,
{
    let mut loader = ServiceLoader::default();
    let mut views = Vec::with_capacity(rows.len());
    for m in rows {
        views.push(loader.load(conn, m).await?);
    }
    Ok(views)
}

async fn host_views<C>(conn: &C, rows: Vec<hosts::Model>) -> Result<Vec<HostView>, ApiError>
where
    C: ConnectionTrait,
{
    let mut views = Vec::with_capacity(rows.len());
    for m in rows {
        views.push(host_view(conn, m).await?);
    }
    sort_labelled(&mut views);
    Ok(views)
}

pub async fn list_clusters<C>(conn: &C) -> Result<ClusterListing, ApiError>
where
    C: ConnectionTrait,
{
    let cluster_rows = clusters::Entity::find()
        .order_by_asc(clusters::Column::Name)
        .order_by_asc(clusters::Column::Id)
        .all(conn)
        .await?;

    let mut by_cluster: HashMap<i32, Vec<HostView>> = HashMap::new();
    let mut unclustered = Vec::new();
    for h in hosts::Entity::find().all(conn).await? {
        let cluster_id = h.cluster_id;
        let view = host_view(conn, h).await?;
        match cluster_id {
            Some(id) => by_cluster.entry(id).or_default().push(view),
            None => unclustered.push(view),
        }
    }
    sort_labelled(&mut unclustered);

    let mut clusters = Vec::with_capacity(cluster_rows.len());
    for c in cluster_rows {
        let mut hosts = by_cluster.remove(&c.id).unwrap_or_default();
        sort_labelled(&mut hosts);
        clusters.push(ClusterHostsView {
            cluster: cluster_view(conn, c).await?,
            hosts,
        });
    }

    Ok(ClusterListing {
        clusters,
        unclustered,
    })
}

pub async fn cluster_detail<C>(conn: &C, id: i32) -> Result<ClusterDetailView, ApiError>
where
    C: ConnectionTrait,
{
    let cluster = fetch::<clusters::Entity, _>(conn, "cluster", id).await?;
    let host_rows = hosts::Entity::find()
        .filter(hosts::Column::ClusterId.eq(cluster.id))
        .all(conn)
        .await?;
    let host_ids: Vec<i32> = host_rows.iter().map(|h| h.id).collect();
    let hosts = host_views(conn, host_rows).await?;

    let service_rows = services::Entity::find()
        .filter(services::Column::HostId.is_in(host_ids))
        .order_by_asc(services::Column::Id)
        .all(conn)
        .await?;
    let services = service_views(conn, service_rows).await?;

    let mut deployments: BTreeMap<i32, DeploymentView> = BTreeMap::new();
    let mut applications: BTreeMap<i32, ApplicationView> = BTreeMap::new();
    let mut per_deployment: BTreeMap<String, BTreeMap<i32, ApplicationView>> = BTreeMap::new();
    for s in &services {
        let application = &s.component.application;
        deployments
            .entry(s.deployment.id)
            .or_insert_with(|| s.deployment.clone());
        applications
            .entry(application.id)
            .or_insert_with(|| application.clone());
        per_deployment
            .entry(s.deployment.name.clone())
            .or_default()
            .entry(application.id)
            .or_insert_with(|| application.clone());
    }

    let mut deployments: Vec<_> = deployments.into_values().collect();
    sort_labelled(&mut deployments);
    let mut applications: Vec<_> = applications.into_values().collect();
    sort_labelled(&mut applications);
    let deployment_applications = per_deployment
        .into_iter()
        .map(|(name, apps)| {
            let mut apps: Vec<_> = apps.into_values().collect();
            sort_labelled(&mut apps);
            (name, apps)
        })
        .collect();

    Ok(ClusterDetailView {
        cluster: cluster_view(conn, cluster).await?,
        hosts,
        deployments,
        applications,
        services,
        deployment_applications,
    })
}

pub async fn list_hosts<C>(conn: &C) -> Result<Vec<HostView>, ApiError>
where
    C: ConnectionTrait,
{
    host_views(conn, hosts::Entity::find().all(conn).await?).await
}

pub async fn host_detail<C>(conn: &C, id: i32) -> Result<HostDetailView, ApiError>
where
    C: ConnectionTrait,
{
    let host = fetch::<hosts::Entity, _>(conn, "host", id).await?;

    let cluster = match host.cluster_id {
        Some(cluster_id) => match clusters::Entity::find_by_id(cluster_id).one(conn).await? {
            Some(c) => Some(cluster_view(conn, c).await?),
            None => None,
        },
        None => None,
    };

    let service_rows = host
        .find_related(services::Entity)
        .order_by_asc(services::Column::Id)
        .all(conn)
        .await?;

    Ok(HostDetailView {
        services: service_views(conn, service_rows).await?,
        host: host_view(conn, host).await?,
        cluster,
    })
}

pub async fn list_applications<C>(conn: &C) -> Result<Vec<ApplicationView>, ApiError>
where
    C: ConnectionTrait,
{
    let mut views = Vec::new();
    for m in applications::Entity::find().all(conn).await? {
        views.push(application_view(conn, m).await?);
    }
    sort_labelled(&mut views);
    Ok(views)
}

pub async fn application_detail<C>(conn: &C, id: i32) -> Result<ApplicationDetailView, ApiError>
where
    C: ConnectionTrait,
{
    let application = fetch::<applications::Entity, _>(conn, "application", id).await?;
    let component_rows = application
        .find_related(components::Entity)
        .order_by_asc(components::Column::Id)
        .all(conn)
        .await?;

    let mut components = Vec::with_capacity(component_rows.len());
    for m in component_rows {
        components.push(component_view(conn, m).await?);
    }

    Ok(ApplicationDetailView {
        application: application_view(conn, application).await?,
        components,
    })
}

pub async fn list_versions<C>(conn: &C) -> Result<Vec<VersionView>, ApiError>
where
    C: ConnectionTrait,
{
    Ok(versions::Entity::find()
        .order_by_asc(versions::Column::Name)
        .order_by_asc(versions::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(version_view)
        .collect())
}

pub async fn version_detail<C>(conn: &C, id: i32) -> Result<VersionDetailView, ApiError>
where
    C: ConnectionTrait,
{
    let version = fetch::<versions::Entity, _>(conn, "version", id).await?;
    let component_rows = version
        .find_related(components::Entity)
        .order_by_asc(components::Column::Id)
        .all(conn)
        .await?;
    let component_ids: Vec<i32> = component_rows.iter().map(|c| c.id).collect();

    let mut components = Vec::with_capacity(component_rows.len());
    for m in component_rows {
        components.push(component_view(conn, m).await?);
    }

    let service_rows = services::Entity::find()
        .filter(services::Column::ComponentId.is_in(component_ids))
        .order_by_asc(services::Column::Id)
        .all(conn)
        .await?;

    Ok(VersionDetailView {
        version: version_view(version),
        components,
        services: service_views(conn, service_rows).await?,
    })
}

pub async fn list_deployments<C>(conn: &C) -> Result<Vec<DeploymentView>, ApiError>
where
    C: ConnectionTrait,
{
    let mut views: Vec<_> = deployments::Entity::find()
        .all(conn)
        .await?
        .into_iter()
        .map(deployment_view)
        .collect();
    sort_labelled(&mut views);
    Ok(views)
}

pub async fn deployment_detail<C>(conn: &C, id: i32) -> Result<DeploymentDetailView, ApiError>
where
    C: ConnectionTrait,
{
    let deployment = fetch::<deployments::Entity, _>(conn, "deployment", id).await?;
    let service_rows = deployment
        .find_related(services::Entity)
        .order_by_asc(services::Column::Id)
        .all(conn)
        .await?;
    let customer_rows = deployment
        .find_related(customers::Entity)
        .order_by_asc(customers::Column::Name)
        .order_by_asc(customers::Column::Id)
        .all(conn)
        .await?;

    let mut customers = Vec::with_capacity(customer_rows.len());
    for m in customer_rows {
        customers.push(customer_view(conn, m).await?);
    }

    Ok(DeploymentDetailView {
        services: service_views(conn, service_rows).await?,
        deployment: deployment_view(deployment),
        customers,
    })
}

pub async fn list_customers<C>(conn: &C) -> Result<Vec<CustomerView>, ApiError>
where
    C: ConnectionTrait,
{
    let rows = customers::Entity::find()
        .order_by_asc(customers::Column::Name)
        .order_by_asc(customers::Column::Id)
        .all(conn)
        .await?;
    let mut views = Vec::with_capacity(rows.len());
    for m in rows {
        views.push(customer_view(conn, m).await?);
    }
    Ok(views)
}

pub async fn customer_detail<C>(conn: &C, id: i32) -> Result<CustomerDetailView, ApiError>
where
    C: ConnectionTrait,
{
    let customer = fetch::<customers::Entity, _>(conn, "customer", id).await?;
    let mut deployments: Vec<_> = customer
        .find_related(deployments::Entity)
        .all(conn)
        .await?
        .into_iter()
        .map(deployment_view)
        .collect();
    sort_labelled(&mut deployments);

    Ok(CustomerDetailView {
        customer: customer_view(conn, customer).await?,
        deployments,
    })
}

pub async fn list_releases<C>(conn: &C) -> Result<Vec<ReleaseView>, ApiError>
where
    C: ConnectionTrait,
{
    let rows = releases::Entity::find()
        .order_by_asc(releases::Column::Name)
        .order_by_asc(releases::Column::Id)
        .all(conn)
        .await?;
    let mut views = Vec::with_capacity(rows.len());
    for m in rows {
        views.push(release_view(conn, m).await?);
    }
    Ok(views)
}

pub async fn release_detail<C>(conn: &C, id: i32) -> Result<ReleaseDetailView, ApiError>
where
    C: ConnectionTrait,
{
    let release = fetch::<releases::Entity, _>(conn, "release", id).await?;
    let service_rows = release
        .find_related(services::Entity)
        .order_by_asc(services::Column::Id)
        .all(conn)
        .await?;

    Ok(ReleaseDetailView {
        services: service_views(conn, service_rows).await?,
        release: release_view(conn, release).await?,
    })
}

#[cfg(test)]
mod tests {
    use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
    use versionmgr_view::ReportRequest;

    use super::*;
    use crate::store::{
        Report, add_attribute, attach_deployment, attach_service, create_customer,
        create_release, report,
    };
    use crate::test_support::test_db;

    async fn submit(
        db: &DatabaseConnection,
        host: &str,
        application: &str,
        version: &str,
        deployment: Option<&str>,
        cluster: Option<&str>,
    ) {
        let req = ReportRequest {
            host: Some(host.to_string()),
            application: Some(application.to_string()),
            version: Some(version.to_string()),
            deployment: deployment.map(str::to_string),
            cluster: cluster.map(str::to_string),
            ..Default::default()
        };
        let r = Report::from_request(req, None).unwrap();
        let txn = db.begin().await.unwrap();
        report(&txn, &r).await.unwrap();
        txn.commit().await.unwrap();
    }

    async fn host_named(db: &DatabaseConnection, name: &str) -> hosts::Model {
        hosts::Entity::find()
            .filter(hosts::Column::Name.eq(name))
            .one(db)
            .await
            .unwrap()
            .unwrap()
    }

    async fn set_host_label(db: &DatabaseConnection, name: &str, label: &str) {
        let mut active: hosts::ActiveModel = host_named(db, name).await.into();
        active.label = Set(Some(label.to_string()));
        active.update(db).await.unwrap();
    }

    #[tokio::test]
    async fn cluster_listing_places_every_host_once() {
        let db = test_db().await;
        submit(&db, "web1", "shop", "1.0", None, Some("berlin")).await;
        submit(&db, "web2", "shop", "1.0", None, Some("berlin")).await;
        submit(&db, "db1", "pg", "15", None, Some("amsterdam")).await;
        submit(&db, "laptop", "shop", "1.1-dev", None, None).await;

        let listing = list_clusters(&db).await.unwrap();

        let names: Vec<_> = listing.clusters.iter().map(|c| c.cluster.name.as_str()).collect();
        assert_eq!(names, ["amsterdam", "berlin"]);
        let berlin: Vec<_> = listing.clusters[1].hosts.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(berlin, ["web1", "web2"]);
        assert_eq!(listing.unclustered.len(), 1);
        assert_eq!(listing.unclustered[0].name, "laptop");

        let placed = listing.clusters.iter().map(|c| c.hosts.len()).sum::<usize>()
            + listing.unclustered.len();
        assert_eq!(placed, 4);
    }

    #[tokio::test]
    async fn hosts_sort_by_label_then_name_with_unlabelled_last() {
        let db = test_db().await;
        for host in ["a", "b", "c", "d"] {
            submit(&db, host, "shop", "1.0", None, None).await;
        }
        set_host_label(&db, "d", "alpha").await;
        set_host_label(&db, "c", "beta").await;

        let names: Vec<_> = list_hosts(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(names, ["d", "c", "a", "b"]);
    }

    #[tokio::test]
    async fn cluster_detail_aggregates_across_hosts() {
        let db = test_db().await;
        submit(&db, "web1", "shop", "1.0", None, Some("berlin")).await;
        submit(&db, "web2", "shop", "1.0", None, Some("berlin")).await;
        submit(&db, "web2", "search", "3.2", Some("staging"), Some("berlin")).await;
        submit(&db, "elsewhere", "billing", "9", None, None).await;

        let cluster = clusters::Entity::find().one(&db).await.unwrap().unwrap();
        let detail = cluster_detail(&db, cluster.id).await.unwrap();

        assert_eq!(detail.hosts.len(), 2);
        assert_eq!(detail.services.len(), 3);

        let deployments: Vec<_> = detail.deployments.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(deployments, ["default", "staging"]);
        let applications: Vec<_> = detail.applications.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(applications, ["search", "shop"]);

        let default: Vec<_> = detail.deployment_applications["default"]
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(default, ["shop"]);
        let staging: Vec<_> = detail.deployment_applications["staging"]
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(staging, ["search"]);
    }

    #[tokio::test]
    async fn empty_cluster_detail_has_empty_relations() {
        let db = test_db().await;
        let cluster = clusters::ActiveModel {
            name: Set("idle".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let detail = cluster_detail(&db, cluster.id).await.unwrap();
        assert!(detail.hosts.is_empty());
        assert!(detail.services.is_empty());
        assert!(detail.deployment_applications.is_empty());
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let db = test_db().await;
        assert!(matches!(
            host_detail(&db, 99).await,
            Err(ApiError::NotFound { kind: "host", id: 99 })
        ));
        assert!(matches!(
            release_detail(&db, 1).await,
            Err(ApiError::NotFound { kind: "release", .. })
        ));
    }

    #[tokio::test]
    async fn host_detail_carries_cluster_services_and_attributes() {
        let db = test_db().await;
        submit(&db, "web1", "shop", "1.0", None, Some("berlin")).await;
        submit(&db, "web1", "shop", "1.1", Some("canary"), None).await;
        let host = host_named(&db, "web1").await;
        add_attribute(&db, AttributeOwner::Host(host.id), "rack", "r12")
            .await
            .unwrap();

        let detail = host_detail(&db, host.id).await.unwrap();
        assert_eq!(detail.cluster.map(|c| c.name).as_deref(), Some("berlin"));
        assert_eq!(detail.host.attributes.len(), 1);
        assert_eq!(detail.host.attributes[0].value, "r12");

        let versions: Vec<_> = detail
            .services
            .iter()
            .map(|s| s.component.version.name.as_str())
            .collect();
        assert_eq!(versions, ["1.0", "1.1"]);
    }

    #[tokio::test]
    async fn version_detail_lists_services_running_it() {
        let db = test_db().await;
        submit(&db, "a", "shop", "2.0", None, None).await;
        submit(&db, "b", "shop", "2.0", None, None).await;
        submit(&db, "c", "shop", "1.9", None, None).await;

        let version = versions::Entity::find()
            .filter(versions::Column::Name.eq("2.0"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let detail = version_detail(&db, version.id).await.unwrap();
        assert_eq!(detail.components.len(), 1);
        let hosts: Vec<_> = detail.services.iter().map(|s| s.host.name.as_str()).collect();
        assert_eq!(hosts, ["a", "b"]);

        let names: Vec<_> = list_versions(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, ["1.9", "2.0"]);
    }

    #[tokio::test]
    async fn customers_and_releases_expand_their_links() {
        let db = test_db().await;
        submit(&db, "web1", "shop", "1.0", Some("production"), None).await;
        let deployment = deployments::Entity::find().one(&db).await.unwrap().unwrap();
        let service = services::Entity::find().one(&db).await.unwrap().unwrap();

        let customer = create_customer(&db, "acme").await.unwrap();
        attach_deployment(&db, customer.id, deployment.id).await.unwrap();
        let release = create_release(&db, "2024.1").await.unwrap();
        attach_service(&db, release.id, service.id).await.unwrap();

        let detail = customer_detail(&db, customer.id).await.unwrap();
        assert_eq!(detail.deployments.len(), 1);
        assert_eq!(detail.deployments[0].name, "production");

        let detail = deployment_detail(&db, deployment.id).await.unwrap();
        assert_eq!(detail.customers.len(), 1);
        assert_eq!(detail.services.len(), 1);

        let detail = release_detail(&db, release.id).await.unwrap();
        assert_eq!(detail.services.len(), 1);
        assert_eq!(detail.services[0].component.application.name, "shop");
    }

    #[tokio::test]
    async fn application_detail_lists_components() {
        let db = test_db().await;
        submit(&db, "a", "shop", "1.0", None, None).await;
        submit(&db, "b", "shop", "1.1", None, None).await;

        let app = applications::Entity::find().one(&db).await.unwrap().unwrap();
        let detail = application_detail(&db, app.id).await.unwrap();
        let versions: Vec<_> = detail
            .components
            .iter()
            .map(|c| c.version.name.as_str())
            .collect();
        assert_eq!(versions, ["1.0", "1.1"]);
        assert_eq!(list_applications(&db).await.unwrap().len(), 1);
        assert_eq!(list_deployments(&db).await.unwrap()[0].name, "default");
    }
}
