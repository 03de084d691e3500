use chrono::{DateTime, Utc};
use chrono_tz::Tz;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid timezone")]
    InvalidTimezone,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Formats the current instant in the named IANA timezone.
pub fn time_in_zone(timezone: &str) -> Result<String> {
    format_in_zone(Utc::now(), timezone)
}

pub fn format_in_zone(instant: DateTime<Utc>, timezone: &str) -> Result<String> {
    let tz: Tz = timezone.parse().map_err(|_| Error::InvalidTimezone)?;
    Ok(instant.with_timezone(&tz).format(TIME_FORMAT).to_string())
}
