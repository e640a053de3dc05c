//! Database migrations.

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_user_table;
mod m20250301_000002_create_voter_table;
mod m20250301_000003_create_volunteer_request_table;
mod m20250301_000004_create_voter_request_table;
mod m20250301_000005_create_complaint_table;
mod m20250301_000006_create_task_table;
mod m20250301_000007_create_event_table;
mod m20250301_000008_create_badge_table;
mod m20250301_000009_create_audit_log_table;
mod m20250301_000010_create_login_audit_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_user_table::Migration),
            Box::new(m20250301_000002_create_voter_table::Migration),
            Box::new(m20250301_000003_create_volunteer_request_table::Migration),
            Box::new(m20250301_000004_create_voter_request_table::Migration),
            Box::new(m20250301_000005_create_complaint_table::Migration),
            Box::new(m20250301_000006_create_task_table::Migration),
            Box::new(m20250301_000007_create_event_table::Migration),
            Box::new(m20250301_000008_create_badge_table::Migration),
            Box::new(m20250301_000009_create_audit_log_table::Migration),
            Box::new(m20250301_000010_create_login_audit_table::Migration),
        ]
    }
}
