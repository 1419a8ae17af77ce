//! Records produced by the table parser and consumed by the renderer.

/// A country and the time zones observed in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code, e.g. `CA`
    pub code: String,
    pub name: String,
    pub zones: Vec<Zone>,
}

impl Country {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            zones: Vec::new(),
        }
    }
}

/// A time zone identifier, such as `America/Toronto`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Code of the owning country; a back-reference, not ownership
    pub country_code: String,
    pub name: String,
}

impl Zone {
    pub fn new(country_code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            name: name.into(),
        }
    }
}
