use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202606010001_create_users::Migration),
            Box::new(migrations::m202606010002_create_terms::Migration),
            Box::new(migrations::m202606010003_create_cohorts::Migration),
            Box::new(migrations::m202606010004_create_high_schools::Migration),
            Box::new(migrations::m202606010005_create_teachers::Migration),
            Box::new(migrations::m202606010006_create_event_types::Migration),
            Box::new(migrations::m202606010007_create_events::Migration),
            Box::new(migrations::m202606010008_create_event_attendees::Migration),
            Box::new(migrations::m202606010009_create_event_files::Migration),
            Box::new(migrations::m202606010010_create_event_notes::Migration),
            Box::new(migrations::m202606010011_create_settings::Migration),
            Box::new(migrations::m202606010012_create_report_runs::Migration),
        ]
    }
}
