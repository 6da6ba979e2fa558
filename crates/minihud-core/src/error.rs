use thiserror::Error;

#[derive(Debug, Error)]
pub enum HudError {
    #[error("no HUD registered for object {0}")]
    NotRegistered(String),

    #[error("invalid settings: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("store error: {0}")]
    Store(#[from] minihud_store::StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HudResult<T> = Result<T, HudError>;
