use sea_orm_migration::prelude::*;

mod m0001_create_clusters;
mod m0002_create_hosts;
mod m0003_create_applications;
mod m0004_create_versions;
mod m0005_create_deployments;
mod m0006_create_components;
mod m0007_create_services;
mod m0008_create_customers;
mod m0009_create_releases;
mod m0010_create_attributes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m0001_create_clusters::Migration),
            Box::new(m0002_create_hosts::Migration),
            Box::new(m0003_create_applications::Migration),
            Box::new(m0004_create_versions::Migration),
            Box::new(m0005_create_deployments::Migration),
            Box::new(m0006_create_components::Migration),
            Box::new(m0007_create_services::Migration),
            Box::new(m0008_create_customers::Migration),
            Box::new(m0009_create_releases::Migration),
            Box::new(m0010_create_attributes::Migration),
        ]
    }
}
