use chrono::FixedOffset;
use database::registration::Registrar;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub registrar: Registrar,
    /// Offset used to show times to users
    pub utc_offset: FixedOffset,
    /// Token groups or roles that may run staff-only operations
    pub staff_roles: Arc<[String]>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, utc_offset: FixedOffset, staff_roles: Vec<String>) -> Self {
        Self {
            db,
            registrar: Registrar::new(utc_offset),
            utc_offset,
            staff_roles: staff_roles.into(),
        }
    }
}
