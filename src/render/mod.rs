//! Renders the joined dataset as a standalone Rust module.
//!
//! The output declares its own `Country` and `Zone` types, a static slice
//! of every country in sorted order, and two accessors. The code → country
//! map behind `get_country` is built on first use inside a `OnceLock`, so
//! concurrent first callers block until the single build finishes and then
//! share the same immutable map.

use std::fmt::Write;

use crate::error::Result;
use crate::model::Country;

const TYPES: &str = r#"use std::collections::HashMap;
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
"#;

const ACCESSORS: &str = r#"
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
"#;

/// Render `countries` into the source of the generated module.
///
/// `source` is recorded in the header so readers know where the data came
/// from; it is escaped so it stays on the single comment line. String
/// fields are written as escaped Rust literals.
pub fn render(countries: &[Country], source: &str) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "// GENERATED FILE DO NOT MODIFY DIRECTLY")?;
    writeln!(out, "// Source: {}", source.escape_debug())?;
    writeln!(out)?;
    out.push_str(TYPES);
    writeln!(out)?;

    writeln!(out, "static COUNTRIES: &[Country] = &[")?;
    for country in countries {
        writeln!(out, "    Country {{")?;
        writeln!(out, "        code: {},", literal(&country.code))?;
        writeln!(out, "        name: {},", literal(&country.name))?;
        if country.zones.is_empty() {
            writeln!(out, "        zones: &[],")?;
        } else {
            writeln!(out, "        zones: &[")?;
            for zone in &country.zones {
                writeln!(out, "            Zone {{")?;
                writeln!(out, "                country_code: {},", literal(&zone.country_code))?;
                writeln!(out, "                name: {},", literal(&zone.name))?;
                writeln!(out, "            }},")?;
            }
            writeln!(out, "        ],")?;
        }
        writeln!(out, "    }},")?;
    }
    writeln!(out, "];")?;

    out.push_str(ACCESSORS);
    Ok(out)
}

/// Quote a string as a Rust string literal.
///
/// `Debug` for `str` escapes quotes, backslashes and control characters
/// and leaves printable Unicode alone, which is valid literal syntax.
fn literal(value: &str) -> String {
    format!("{value:?}")
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Zone;
    use std::sync::Barrier;
    use std::thread;

    const SOURCE: &str = "https://timezonedb.com/files/timezonedb.csv.zip";

    fn sample_countries() -> Vec<Country> {
        let mut canada = Country::new("CA", "Canada");
        canada.zones.push(Zone::new("CA", "America/Toronto"));

        let mut united_states = Country::new("US", "United States");
        united_states.zones.push(Zone::new("US", "America/Chicago"));
        united_states.zones.push(Zone::new("US", "America/New_York"));

        vec![
            Country::new("AQ", "Antarctica"),
            canada,
            Country::new("CI", "Côte d'Ivoire"),
            united_states,
        ]
    }

    fn normalize(source: &str) -> String {
        source.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_render_matches_checked_in_sample() {
        let rendered = render(&sample_countries(), SOURCE).unwrap();
        assert_eq!(
            normalize(&rendered),
            normalize(include_str!("testdata/tz_data.rs"))
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let countries = sample_countries();
        assert_eq!(
            render(&countries, SOURCE).unwrap(),
            render(&countries, SOURCE).unwrap()
        );
    }

    #[test]
    fn test_render_escapes_string_fields() {
        let countries = vec![Country::new("XX", "Say \"hi\" \\ bye\n")];
        let rendered = render(&countries, SOURCE).unwrap();
        assert!(rendered.contains(r#"name: "Say \"hi\" \\ bye\n","#));
    }

    #[test]
    fn test_source_stays_in_header_comment() {
        let source = "archive.zip\nfn injected() {}\r\n";
        let rendered = render(&[], source).unwrap();

        assert!(rendered.lines().all(|line| !line.starts_with("fn injected")));
        assert_eq!(
            rendered.lines().nth(1),
            Some(r"// Source: archive.zip\nfn injected() {}\r\n")
        );
    }

    #[test]
    fn test_render_empty_dataset() {
        let rendered = render(&[], SOURCE).unwrap();
        assert!(rendered.contains("static COUNTRIES: &[Country] = &[\n];"));
        assert!(rendered.contains("pub fn get_country(code: &str)"));
    }

    #[test]
    fn test_sample_accessors() {
        let countries = sample::get_countries();
        assert_eq!(countries.len(), 4);
        assert!(countries.windows(2).all(|w| w[0].name <= w[1].name));

        let us = sample::get_country("US").unwrap();
        assert_eq!(us.name, "United States");
        let zones: Vec<&str> = us.zones.iter().map(|z| z.name).collect();
        assert_eq!(zones, vec!["America/Chicago", "America/New_York"]);

        assert_eq!(sample::get_country("CI").unwrap().name, "Côte d'Ivoire");
        assert!(sample::get_country("AQ").unwrap().zones.is_empty());
        assert!(sample::get_country("ZZ").is_none());
    }

    #[test]
    fn test_sample_index_built_once_under_contention() {
        const THREADS: usize = 8;
        let barrier = Barrier::new(THREADS);

        let found: Vec<&'static sample::Country> = thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        sample::get_country("CA").unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let canada = &sample::get_countries()[1];
        assert!(found.iter().all(|c| std::ptr::eq(*c, canada)));
    }
}
