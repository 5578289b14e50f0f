#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid root: {0}")]
    InvalidRoot(String),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Launch error: {0}")]
    Launch(String),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
