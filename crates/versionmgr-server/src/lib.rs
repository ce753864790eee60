pub mod config;
pub mod error;
pub mod health;
pub mod projection;
pub mod request_meta;
pub mod routes;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
