//! Joins parsed zones onto their countries and puts the result in a
//! stable order.

use std::collections::HashMap;
use tracing::{debug, error, info, warn};

use crate::model::{Country, Zone};
use crate::validate::ZoneValidator;

/// Counters collected while joining zones onto countries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub countries: usize,
    /// Country rows whose code was already taken by an earlier row
    pub duplicate_codes: usize,
    pub zones: usize,
    /// Zones dropped because the identifier failed validation
    pub rejected: usize,
    /// Zones dropped because no parsed country has their code
    pub orphaned: usize,
}

/// Attach each valid zone to its country.
///
/// Countries keep file order and every row is kept, including rows that
/// repeat an earlier code. The code index is last-write-wins, so zones
/// for a repeated code land on the last country row with that code.
///
/// Zones are validated first and then looked up by country code; a zone
/// failing either step is dropped without failing the join.
pub fn join(
    countries: Vec<Country>,
    zones: Vec<Zone>,
    validator: &dyn ZoneValidator,
) -> (Vec<Country>, JoinStats) {
    let mut stats = JoinStats::default();

    let mut index: HashMap<String, usize> = HashMap::with_capacity(countries.len());
    let mut joined: Vec<Country> = Vec::with_capacity(countries.len());
    for country in countries {
        if let Some(previous) = index.insert(country.code.clone(), joined.len()) {
            warn!(
                code = %country.code,
                previous = %joined[previous].name,
                replacement = %country.name,
                "duplicate country code; earlier row will receive no zones"
            );
            stats.duplicate_codes += 1;
        }
        joined.push(country);
    }
    stats.countries = joined.len();

    for zone in zones {
        if let Err(reason) = validator.validate(&zone.name) {
            error!(zone = %zone.name, country = %zone.country_code, %reason, "invalid time zone");
            stats.rejected += 1;
            continue;
        }

        let Some(&idx) = index.get(&zone.country_code) else {
            debug!(zone = %zone.name, country = %zone.country_code, "no such country");
            stats.orphaned += 1;
            continue;
        };

        joined[idx].zones.push(zone);
        stats.zones += 1;
    }

    info!(
        countries = stats.countries,
        zones = stats.zones,
        rejected = stats.rejected,
        orphaned = stats.orphaned,
        "joined dataset"
    );

    (joined, stats)
}

/// Sort countries, and the zones within each country, by name.
///
/// Both sorts are stable and compare names byte-wise, so equal names keep
/// their input order and the output is reproducible run to run.
pub fn sort(countries: &mut [Country]) {
    countries.sort_by(|a, b| a.name.cmp(&b.name));
    for country in countries.iter_mut() {
        country.zones.sort_by(|a, b| a.name.cmp(&b.name));
    }
}
