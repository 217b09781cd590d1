use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The count must be a positive integer, got {0}")]
    InvalidCount(i64),

    #[error("The count must be a positive integer, got `{0}`")]
    UnparsableCount(String),

    #[error("Unsupported date unit `{0}`")]
    UnsupportedUnit(String),

    #[error("Date arithmetic left the range chrono can represent")]
    OutOfRange,

    #[error("Unknown range mode `{0}`, expected `inclusive` or `exclusive`")]
    InvalidMode(String),

    #[error("Unknown preset `{0}`")]
    UnknownPreset(String),

    #[error("Preset `{0}` needs a count")]
    MissingCount(String),

    #[error("Preset `{0}` does not take a count")]
    UnexpectedCount(String),

    #[error("Preset `{0}` is always inclusive and does not accept a range mode")]
    ForcedMode(String),

    #[error("Could not read `{value}` in column `{column}` as a timestamp")]
    InvalidTimestamp { column: String, value: String },

    #[error("Could not read `{0}` as an anchor timestamp")]
    InvalidAnchor(String),

    #[error("Invalid setting `{field}`: {message}")]
    Config { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Context(String),
}

pub type Result<T> = std::result::Result<T, Error>;

// Helper trait to provide context for errors
pub trait ResultExt<T> {
    fn context(self, context: &str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn context(self, context: &str) -> Result<T> {
        self.map_err(|e| Error::Context(format!("{}: {}", context, e)))
    }
}
