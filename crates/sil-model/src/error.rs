use thiserror::Error;

/// Errors produced while loading, editing, or saving a layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON in '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid layout file '{0}': missing 'controller_mappings' at root level")]
    MissingMappings(String),

    #[error("unknown identity key: '{0}'")]
    UnknownKey(String),

    #[error("'{0}' is an action set, not an action layer")]
    NotAnActionLayer(String),

    #[error("'{0}' is an action layer, not an action set")]
    NotAnActionSet(String),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
