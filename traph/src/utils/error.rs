use strum::EnumIs;
use thiserror::Error;

/// Boxed error type produced by rule bodies.
pub type RuleFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error, EnumIs)]
pub enum TraphError {
    /// A rule read an input key that the supplied input record does not contain.
    #[error("Data object is missing key '{key}'")]
    MissingInputField { key: String },

    /// A rule body failed. The engine hands this back to the reader untouched.
    #[error("Rule failed: {0}")]
    Rule(RuleFailure),

    /// The requested output field is not part of the compiled shape.
    #[error("Field '{field}' is not defined by this transform")]
    UnknownField { field: String },

    /// A field was read again while its own rule was still running on the same thread.
    #[error(
        "Field '{field}' was read while it was being evaluated. The rules reference each other cyclically."
    )]
    CyclicDependency { field: String },

    #[error("Field '{field}' is defined more than once in the rule mapping")]
    DuplicateField { field: String },

    #[error("Rule mapping contains a field with an empty name")]
    EmptyFieldName,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration file '{file}': {source}")]
    ConfigParseError {
        source: toml::de::Error,
        file: String,
    },

    #[error("Environment variable {var} has unsupported value '{value}'")]
    InvalidEnvValue { var: String, value: String },
}

impl TraphError {
    /// Wraps any error (or message) raised from inside a rule body.
    pub fn rule(err: impl Into<RuleFailure>) -> Self {
        TraphError::Rule(err.into())
    }
}

pub type TraphResult<T> = Result<T, TraphError>;
