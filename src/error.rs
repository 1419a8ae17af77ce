use std::path::PathBuf;

/// Fatal errors raised by the generator pipeline.
///
/// Rejected zone identifiers and zones without a country are not errors;
/// they are logged and counted by the join instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure or a non-200 response while downloading the archive
    #[error("failed to download dataset from {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The buffer is not a ZIP archive we can read
    #[error("invalid archive: {0}")]
    Archive(String),

    /// A required table is not present in the archive
    #[error("entry {name:?} not found in archive")]
    MissingEntry { name: &'static str },

    /// Malformed row or unreadable stream while parsing a table
    #[error("{table}: line {line}{}: {message}", column_suffix(.column))]
    Parse {
        table: &'static str,
        line: u64,
        column: Option<usize>,
        message: String,
    },

    /// The dataset could not be written into the source template
    #[error("failed to render template: {0}")]
    Render(#[from] std::fmt::Error),

    /// The output file could not be created or written
    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external formatter could not be run or reported failure
    #[error("formatter failed on {path}: {reason}")]
    Format { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

fn column_suffix(column: &Option<usize>) -> String {
    column.map(|c| format!(", column {c}")).unwrap_or_default()
}
