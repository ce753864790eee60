use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use versionmgr_db::entities::{
    applications, clusters, components, deployments, hosts, services, versions,
};
use versionmgr_view::ReportRequest;

use super::upsert::get_or_create;
use crate::error::ApiError;

pub const DEFAULT_DEPLOYMENT: &str = "default";

/// A validated "this is running here" report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub host: String,
    pub application: String,
    pub version: String,
    pub deployment: String,
    pub arguments: Option<String>,
    /// Attach the host to this cluster; `None` leaves its cluster alone.
    pub cluster: Option<String>,
}

fn present(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Report {
    /// Validates a wire request. `fallback_host` stands in for a missing
    /// `host`, normally the peer address of the reporting connection.
    pub fn from_request(req: ReportRequest, fallback_host: Option<String>) -> Result<Self, ApiError> {
        let application =
            present(req.application).ok_or_else(|| ApiError::malformed("application is required"))?;
        let version =
            present(req.version).ok_or_else(|| ApiError::malformed("version is required"))?;
        let host = present(req.host)
            .or_else(|| present(fallback_host))
            .ok_or_else(|| ApiError::malformed("host is required"))?;

        Ok(Self {
            host,
            application,
            version,
            deployment: present(req.deployment).unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string()),
            arguments: req.arguments,
            cluster: present(req.cluster),
        })
    }
}

async fn find_or_create_host<C>(conn: &C, name: &str) -> Result<hosts::Model, ApiError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let select = hosts::Entity::find().filter(hosts::Column::Name.eq(name));
    let model = hosts::ActiveModel {
        name: Set(name.to_string()),
        label: Set(None),
        cluster_id: Set(None),
        ..Default::default()
    };
    Ok(get_or_create(conn, "host", select, model).await?.0)
}

async fn attach_to_cluster<C>(
    conn: &C,
    host: hosts::Model,
    cluster_name: &str,
) -> Result<hosts::Model, ApiError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let select = clusters::Entity::find().filter(clusters::Column::Name.eq(cluster_name));
    let model = clusters::ActiveModel {
        name: Set(cluster_name.to_string()),
        ..Default::default()
    };
    let (cluster, _) = get_or_create(conn, "cluster", select, model).await?;

    if host.cluster_id == Some(cluster.id) {
        return Ok(host);
    }

    tracing::info!(host = %host.name, cluster = %cluster.name, "moving host to cluster");
    let mut active: hosts::ActiveModel = host.into();
    active.cluster_id = Set(Some(cluster.id));
    Ok(active.update(conn).await?)
}

async fn find_or_create_application<C>(conn: &C, name: &str) -> Result<applications::Model, ApiError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let select = applications::Entity::find().filter(applications::Column::Name.eq(name));
    let model = applications::ActiveModel {
        name: Set(name.to_string()),
        label: Set(None),
        description: Set(None),
        ..Default::default()
    };
    Ok(get_or_create(conn, "application", select, model).await?.0)
}

async fn find_or_create_version<C>(conn: &C, name: &str) -> Result<versions::Model, ApiError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let select = versions::Entity::find().filter(versions::Column::Name.eq(name));
    let model = versions::ActiveModel {
        name: Set(name.to_string()),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };
    Ok(get_or_create(conn, "version", select, model).await?.0)
}

async fn find_or_create_deployment<C>(conn: &C, name: &str) -> Result<deployments::Model, ApiError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let select = deployments::Entity::find().filter(deployments::Column::Name.eq(name));
    let model = deployments::ActiveModel {
        name: Set(name.to_string()),
        label: Set(None),
        ..Default::default()
    };
    Ok(get_or_create(conn, "deployment", select, model).await?.0)
}

async fn find_or_create_component<C>(
    conn: &C,
    version: &versions::Model,
    application: &applications::Model,
) -> Result<components::Model, ApiError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let select = components::Entity::find()
        .filter(components::Column::VersionId.eq(version.id))
        .filter(components::Column::ApplicationId.eq(application.id));
    let model = components::ActiveModel {
        version_id: Set(version.id),
        application_id: Set(application.id),
        ..Default::default()
    };
    Ok(get_or_create(conn, "component", select, model).await?.0)
}

/// Version name the service's component currently points at.
async fn current_version_name<C>(conn: &C, service: &services::Model) -> Result<String, ApiError>
where
    C: ConnectionTrait,
{
    let component = components::Entity::find_by_id(service.component_id)
        .one(conn)
        .await?
        .ok_or(ApiError::NotFound {
            kind: "component",
            id: service.component_id,
        })?;
    let version = versions::Entity::find_by_id(component.version_id)
        .one(conn)
        .await?
        .ok_or(ApiError::NotFound {
            kind: "version",
            id: component.version_id,
        })?;
    Ok(version.name)
}

/// Records that `report.application` at `report.version` runs on
/// `report.host` under `report.deployment`.
///
/// Returns the version previously recorded for that host+deployment, or
/// `None` on the first report. Re-reports always rewrite the service row so
/// its `updated_at` tracks the latest report.
pub async fn report<C>(conn: &C, report: &Report) -> Result<Option<String>, ApiError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let mut host = find_or_create_host(conn, &report.host).await?;
    if let Some(cluster) = &report.cluster {
        host = attach_to_cluster(conn, host, cluster).await?;
    }
    let application = find_or_create_application(conn, &report.application).await?;
    let version = find_or_create_version(conn, &report.version).await?;
    let deployment = find_or_create_deployment(conn, &report.deployment).await?;
    let component = find_or_create_component(conn, &version, &application).await?;

    let select = services::Entity::find()
        .filter(services::Column::HostId.eq(host.id))
        .filter(services::Column::DeploymentId.eq(deployment.id));
    let model = services::ActiveModel {
        host_id: Set(host.id),
        deployment_id: Set(deployment.id),
        component_id: Set(component.id),
        arguments: Set(report.arguments.clone()),
        updated_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };
    let (service, created) = get_or_create(conn, "service", select, model).await?;

    if created {
        tracing::info!(
            host = %report.host,
            application = %report.application,
            version = %report.version,
            deployment = %report.deployment,
            "new service reported"
        );
        return Ok(None);
    }

    let previous = current_version_name(conn, &service).await?;
    tracing::info!(
        host = %report.host,
        application = %report.application,
        version = %report.version,
        deployment = %report.deployment,
        previous = %previous,
        "service reported"
    );

    let mut active: services::ActiveModel = service.into();
    active.component_id = Set(component.id);
    active.updated_at = Set(chrono::Utc::now().into());
    active.update(conn).await?;

    Ok(Some(previous))
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseConnection, PaginatorTrait};

    use super::*;
    use crate::test_support::test_db;

    fn req(host: &str, application: &str, version: &str) -> ReportRequest {
        ReportRequest {
            host: Some(host.to_string()),
            application: Some(application.to_string()),
            version: Some(version.to_string()),
            ..Default::default()
        }
    }

    async fn submit(db: &DatabaseConnection, req: ReportRequest) -> Option<String> {
        let report = Report::from_request(req, None).unwrap();
        let txn = db.begin().await.unwrap();
        let previous = super::report(&txn, &report).await.unwrap();
        txn.commit().await.unwrap();
        previous
    }

    #[test]
    fn missing_required_fields_are_malformed() {
        let mut r = req("foo", "bar", "1.0");
        r.application = None;
        assert!(matches!(
            Report::from_request(r, None),
            Err(ApiError::MalformedRequest(_))
        ));

        let mut r = req("foo", "bar", "1.0");
        r.version = Some("  ".to_string());
        assert!(matches!(
            Report::from_request(r, None),
            Err(ApiError::MalformedRequest(_))
        ));

        let mut r = req("foo", "bar", "1.0");
        r.host = None;
        assert!(matches!(
            Report::from_request(r, None),
            Err(ApiError::MalformedRequest(_))
        ));
    }

    #[test]
    fn missing_host_falls_back_to_peer() {
        let mut r = req("foo", "bar", "1.0");
        r.host = None;
        let report = Report::from_request(r, Some("10.0.0.7".to_string())).unwrap();
        assert_eq!(report.host, "10.0.0.7");
        assert_eq!(report.deployment, DEFAULT_DEPLOYMENT);
    }

    #[tokio::test]
    async fn first_report_has_no_previous_and_creates_default_deployment() {
        let db = test_db().await;

        assert_eq!(submit(&db, req("foo", "bar", "1.2.3.4")).await, None);

        let deployment = deployments::Entity::find()
            .filter(deployments::Column::Name.eq(DEFAULT_DEPLOYMENT))
            .one(&db)
            .await
            .unwrap();
        assert!(deployment.is_some());
        assert_eq!(hosts::Entity::find().count(&db).await.unwrap(), 1);
        assert_eq!(services::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn re_reports_return_the_version_they_replace() {
        let db = test_db().await;

        assert_eq!(submit(&db, req("foo", "bar", "0.0.1")).await, None);
        assert_eq!(
            submit(&db, req("foo", "bar", "0.0.2")).await.as_deref(),
            Some("0.0.1")
        );
        assert_eq!(
            submit(&db, req("foo", "bar", "0.0.3")).await.as_deref(),
            Some("0.0.2")
        );
    }

    #[tokio::test]
    async fn unchanged_re_report_returns_same_version() {
        let db = test_db().await;

        submit(&db, req("foo", "bar", "0.0.1")).await;
        assert_eq!(
            submit(&db, req("foo", "bar", "0.0.1")).await.as_deref(),
            Some("0.0.1")
        );
    }

    #[tokio::test]
    async fn components_are_never_duplicated() {
        let db = test_db().await;

        for host in ["a", "b", "c"] {
            submit(&db, req(host, "bar", "1.0")).await;
            submit(&db, req(host, "bar", "1.0")).await;
        }

        assert_eq!(components::Entity::find().count(&db).await.unwrap(), 1);
        assert_eq!(versions::Entity::find().count(&db).await.unwrap(), 1);
        assert_eq!(applications::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn one_service_per_host_and_deployment_tracking_latest() {
        let db = test_db().await;

        submit(&db, req("foo", "bar", "1.0")).await;
        submit(&db, req("foo", "bar", "2.0")).await;
        submit(&db, req("foo", "baz", "7.1")).await;

        let all = services::Entity::find().all(&db).await.unwrap();
        assert_eq!(all.len(), 1);

        let component = components::Entity::find_by_id(all[0].component_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let application = applications::Entity::find_by_id(component.application_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(application.name, "baz");
    }

    #[tokio::test]
    async fn deployments_separate_services_on_one_host() {
        let db = test_db().await;

        let mut staging = req("foo", "bar", "2.0-rc1");
        staging.deployment = Some("staging".to_string());

        assert_eq!(submit(&db, req("foo", "bar", "1.0")).await, None);
        assert_eq!(submit(&db, staging).await, None);
        assert_eq!(services::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn arguments_are_stored_on_creation() {
        let db = test_db().await;

        let mut r = req("foo", "bar", "1.0");
        r.arguments = Some("--workers 4".to_string());
        submit(&db, r).await;

        let service = services::Entity::find().one(&db).await.unwrap().unwrap();
        assert_eq!(service.arguments.as_deref(), Some("--workers 4"));
    }

    #[tokio::test]
    async fn report_with_cluster_attaches_host() {
        let db = test_db().await;

        submit(&db, req("foo", "bar", "1.0")).await;
        let host = hosts::Entity::find().one(&db).await.unwrap().unwrap();
        assert_eq!(host.cluster_id, None);

        let mut r = req("foo", "bar", "1.1");
        r.cluster = Some("berlin".to_string());
        submit(&db, r).await;

        let cluster = clusters::Entity::find()
            .filter(clusters::Column::Name.eq("berlin"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let host = hosts::Entity::find().one(&db).await.unwrap().unwrap();
        assert_eq!(host.cluster_id, Some(cluster.id));

        // Reports without a cluster leave the assignment alone.
        submit(&db, req("foo", "bar", "1.2")).await;
        let host = hosts::Entity::find().one(&db).await.unwrap().unwrap();
        assert_eq!(host.cluster_id, Some(cluster.id));
    }

    #[tokio::test]
    async fn duplicate_service_rows_are_rejected_by_the_schema() {
        let db = test_db().await;
        submit(&db, req("foo", "bar", "1.0")).await;

        let existing = services::Entity::find().one(&db).await.unwrap().unwrap();
        let err = services::ActiveModel {
            host_id: Set(existing.host_id),
            deployment_id: Set(existing.deployment_id),
            component_id: Set(existing.component_id),
            arguments: Set(None),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap_err();

        assert!(crate::store::is_unique_violation(&err));
    }
}
