#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    SerializeError(String),
    DeserializeError(String),
    ValidationError(String),
    LockPoisoned,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "Config IO error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Failed to serialize config: {}", e),
            ConfigError::DeserializeError(e) => write!(f, "Failed to deserialize config: {}", e),
            ConfigError::ValidationError(e) => write!(f, "Config validation error: {}", e),
            ConfigError::LockPoisoned => write!(f, "Config cache lock poisoned"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}
