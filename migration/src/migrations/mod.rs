pub mod m202606010001_create_users;
pub mod m202606010002_create_terms;
pub mod m202606010003_create_cohorts;
pub mod m202606010004_create_high_schools;
pub mod m202606010005_create_teachers;
pub mod m202606010006_create_event_types;
pub mod m202606010007_create_events;
pub mod m202606010008_create_event_attendees;
pub mod m202606010009_create_event_files;
pub mod m202606010010_create_event_notes;
pub mod m202606010011_create_settings;
pub mod m202606010012_create_report_runs;
