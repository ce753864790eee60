pub mod application_attributes;
pub mod applications;
pub mod cluster_attributes;
pub mod clusters;
pub mod components;
pub mod customer_attributes;
pub mod customer_deployments;
pub mod customers;
pub mod deployments;
pub mod host_attributes;
pub mod hosts;
pub mod release_attributes;
pub mod release_services;
pub mod releases;
pub mod services;
pub mod versions;
