use thiserror::Error;

/// Errors raised when converting raw configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValueError {
    #[error("config value sets both vault_ref and plaintext")]
    BothSet,

    #[error("config value sets neither vault_ref nor plaintext")]
    NeitherSet,

    #[error("invalid vault reference '{reference}': {reason}")]
    InvalidVaultRef {
        reference: String,
        reason: &'static str,
    },
}
