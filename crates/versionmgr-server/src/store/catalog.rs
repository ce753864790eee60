//! Customers and releases. Neither is touched by the report path; they are
//! curated by operators on top of what hosts report.

use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, Set, sea_query::OnConflict};
use versionmgr_db::entities::{customer_deployments, customers, release_services, releases};

pub async fn create_customer<C>(conn: &C, name: &str) -> Result<customers::Model, DbErr>
where
    C: ConnectionTrait,
{
    customers::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await
}

/// Links a customer to a deployment. Linking twice is a no-op.
pub async fn attach_deployment<C>(conn: &C, customer_id: i32, deployment_id: i32) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let link = customer_deployments::ActiveModel {
        customer_id: Set(customer_id),
        deployment_id: Set(deployment_id),
    };

    customer_deployments::Entity::insert(link)
        .on_conflict(
            OnConflict::columns([
                customer_deployments::Column::CustomerId,
                customer_deployments::Column::DeploymentId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

pub async fn create_release<C>(conn: &C, name: &str) -> Result<releases::Model, DbErr>
where
    C: ConnectionTrait,
{
    releases::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await
}

/// Adds a service to a release bundle. Adding twice is a no-op.
pub async fn attach_service<C>(conn: &C, release_id: i32, service_id: i32) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let link = release_services::ActiveModel {
        release_id: Set(release_id),
        service_id: Set(service_id),
    };

    release_services::Entity::insert(link)
        .on_conflict(
            OnConflict::columns([
                release_services::Column::ReleaseId,
                release_services::Column::ServiceId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
