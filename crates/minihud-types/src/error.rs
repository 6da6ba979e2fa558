use thiserror::Error;

/// Errors produced when parsing user-supplied text into HUD types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("unknown {kind}: {value:?}")]
    UnknownVariant { kind: &'static str, value: String },
}
