use thiserror::Error;

#[derive(Error, Debug)]
pub enum FabDriftError {
    #[error("Intent validation error: {0}")]
    IntentValidation(String),

    #[error("Intent file not found: {0}")]
    IntentNotFound(String),

    #[error("Topology error: {0}")]
    Topology(String),

    #[error("Adapter error on {node}: {message}")]
    Adapter { node: String, message: String },

    #[error("Baseline error: {0}")]
    Baseline(String),

    #[error("Invalid run mode: {0} (expected intent|underlay|control-plane|dataplane|all)")]
    InvalidMode(String),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FabDriftError {
    pub fn adapter(node: impl Into<String>, message: impl Into<String>) -> Self {
        FabDriftError::Adapter {
            node: node.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FabDriftError>;
