use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Cache corruption: {0}")]
    CacheCorruption(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn provider<S: Into<String>>(msg: S) -> Self {
        Self::Provider(msg.into())
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }

    pub fn cache_corruption<S: Into<String>>(msg: S) -> Self {
        Self::CacheCorruption(msg.into())
    }

    pub fn audio<S: Into<String>>(msg: S) -> Self {
        Self::Audio(msg.into())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Upstream timings failures are the only errors the cache may paper over.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::Provider(_))
    }

    pub fn is_pii_safe(&self) -> bool {
        match self {
            Self::Database(_) | Self::Serialization(_) | Self::Anyhow(_) => false,
            Self::Provider(_) | Self::Parse(_) | Self::CacheCorruption(_)
            | Self::Audio(_) | Self::InvalidInput(_) | Self::Config(_)
            | Self::NotFound(_) => true,
        }
    }

    pub fn to_safe_string(&self) -> String {
        if self.is_pii_safe() {
            self.to_string()
        } else {
            match self {
                Self::Database(_) => "Database operation failed".to_string(),
                Self::Serialization(_) => "Malformed data".to_string(),
                Self::Anyhow(_) => "Operation failed".to_string(),
                _ => self.to_string(),
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
