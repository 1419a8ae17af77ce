// GENERATED FILE DO NOT MODIFY DIRECTLY
// Source: https://timezonedb.com/files/timezonedb.csv.zip

use std::collections::HashMap;
use std::sync::OnceLock;

/// A country and the time zones observed in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub zones: &'static [Zone],
}

/// An IANA time zone identifier and the country it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub country_code: &'static str,
    pub name: &'static str,
}

static COUNTRIES: &[Country] = &[
    Country {
        code: "AQ",
        name: "Antarctica",
        zones: &[],
    },
    Country {
        code: "CA",
        name: "Canada",
        zones: &[
            Zone {
                country_code: "CA",
                name: "America/Toronto",
            },
        ],
    },
    Country {
        code: "CI",
        name: "Côte d'Ivoire",
        zones: &[],
    },
    Country {
        code: "US",
        name: "United States",
        zones: &[
            Zone {
                country_code: "US",
                name: "America/Chicago",
            },
            Zone {
                country_code: "US",
                name: "America/New_York",
            },
        ],
    },
];

static MAPPED: OnceLock<HashMap<&'static str, &'static Country>> = OnceLock::new();

fn mapped() -> &'static HashMap<&'static str, &'static Country> {
    MAPPED.get_or_init(|| COUNTRIES.iter().map(|c| (c.code, c)).collect())
}

/// Returns every country, sorted by name.
///
/// Most common use: populating a country picker.
pub fn get_countries() -> &'static [Country] {
    COUNTRIES
}

/// Returns the country with the given code, or `None` if there is none.
pub fn get_country(code: &str) -> Option<&'static Country> {
    mapped().get(code).copied()
}
