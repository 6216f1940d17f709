//! Log database migrations - embedded SQL files
//!
//! Migrations are compiled in with include_str! and applied in order.
//! 000_migrations.sql bootstraps the tracking table and is always first.

/// All log migrations as (filename, sql_content)
///
/// New migrations get the next NNN_ prefix and are appended here.
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
