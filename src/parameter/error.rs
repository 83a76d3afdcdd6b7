use thiserror::Error;

/// Failure converting a submitted selection into a parameter value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("'{value}' is not one of the available choices of parameter '{name}'")]
    UnknownOption { name: String, value: String },

    #[error("Submission is for parameter '{actual}', expected '{expected}'")]
    NameMismatch { expected: String, actual: String },

    #[error("Submission for parameter '{name}' has no string value")]
    MissingValue { name: String },
}
