use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("entry name must not be empty")]
    EmptyName,
    #[error("entry name is reserved: {0}")]
    ReservedName(String),
    #[error("entry name contains a path separator or NUL: {0}")]
    IllegalCharacter(String),
}
