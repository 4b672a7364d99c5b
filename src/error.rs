use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("missing required configuration key `{0}`")]
    MissingKey(&'static str),

    #[error("configuration key `{key}` has value {value}, expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("could not parse configuration: {0}")]
    Parse(String),
}

/// A unit string outside the set the Liberty writer knows how to emit.
#[derive(Debug, Error)]
#[error("unsupported {quantity} unit `{unit}` (expected one of {expected})")]
pub struct UnsupportedUnitError {
    pub quantity: &'static str,
    pub unit: String,
    pub expected: &'static str,
}

#[derive(Debug, Error)]
pub enum InvalidModelError {
    #[error("memory `{memory}`: `{field}` must be positive, got {value}")]
    NonPositive {
        memory: String,
        field: &'static str,
        value: f64,
    },

    #[error("memory `{memory}`: `{field}` must be a non-negative finite number, got {value}")]
    Negative {
        memory: String,
        field: &'static str,
        value: f64,
    },

    #[error("memory `{memory}`: {reason}")]
    Malformed { memory: String, reason: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    InvalidModel(#[from] InvalidModelError),

    #[error(transparent)]
    UnsupportedUnit(#[from] UnsupportedUnitError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
