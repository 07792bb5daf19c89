use std::env;

/// Offset of the platform's reporting timezone from UTC, in hours.
///
/// Every "today" comparison (rate/block immutability, calendar defaults) is
/// anchored to this civil timezone, never to the host clock's zone.
pub const REPORTING_TZ_OFFSET_HOURS: i32 = 7;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "rentbook.db".to_string()),
        }
    }
}
