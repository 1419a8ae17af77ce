//! Existence checks for time zone identifiers.

use tracing::warn;

/// Decides whether a time zone identifier is usable by consumers of the
/// generated dataset.
pub trait ZoneValidator {
    /// Returns the reason when `name` is not a recognized identifier.
    fn validate(&self, name: &str) -> Result<(), String>;
}

/// Validates against the host's zoneinfo database via `jiff`.
///
/// Lookups are exact: `jiff` resolves names case-insensitively, but a
/// generated identifier must match the database spelling byte for byte.
pub struct SystemTzdb {
    db: &'static jiff::tz::TimeZoneDatabase,
}

impl SystemTzdb {
    pub fn new() -> Self {
        let tzdb = Self { db: jiff::tz::db() };
        if tzdb.is_empty() {
            warn!("no time zone database found on this system; every zone will be rejected");
        }
        tzdb
    }

    /// True when no zoneinfo data could be found at all
    pub fn is_empty(&self) -> bool {
        self.db.is_definitively_empty()
    }
}

impl Default for SystemTzdb {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneValidator for SystemTzdb {
    fn validate(&self, name: &str) -> Result<(), String> {
        let tz = self.db.get(name).map_err(|e| e.to_string())?;
        match tz.iana_name() {
            Some(found) if found == name => Ok(()),
            Some(found) => Err(format!("{name:?} is spelled {found:?} in the database")),
            None => Err(format!("{name:?} did not resolve to a named time zone")),
        }
    }
}

impl<F> ZoneValidator for F
where
    F: Fn(&str) -> Result<(), String>,
{
    fn validate(&self, name: &str) -> Result<(), String> {
        self(name)
    }
}
