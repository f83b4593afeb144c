use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown design variable label: {label}")]
    UnknownLabel { label: String },

    #[error("Invalid case name: {name}")]
    InvalidCaseName { name: String },
}
