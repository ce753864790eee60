//! Persistence operations over the inventory tables.
//!
//! Everything here is generic over the connection so callers decide the
//! transaction scope: the report path runs on a request-scoped
//! `DatabaseTransaction`, reads usually run on the pool directly.

mod attributes;
mod catalog;
mod report;
mod upsert;

pub use attributes::{AttributeOwner, add_attribute, attributes_of};
pub use catalog::{attach_deployment, attach_service, create_customer, create_release};
pub use report::{DEFAULT_DEPLOYMENT, Report, report};
pub use upsert::{get_or_create, insert_or_refetch, is_unique_violation};
