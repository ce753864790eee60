use std::sync::Arc;

use versionmgr_db::sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub read_only: bool,
}
