use thiserror::Error;

/// The main error type for skaff operations
#[derive(Debug, Error)]
pub enum SkaffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid project name: {0}")]
    Name(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Cyclic task dependency: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),

    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("Task '{name}' failed: {message}")]
    Task { name: String, message: String },

    #[error("Task '{0}' signaled completion more than once")]
    DoubleCompletion(String),

    /// Not a system error: the user answered a confirmation in the negative
    /// (or the target refused to be overwritten). Printed without an error
    /// banner and mapped to exit status 1.
    #[error("{0}")]
    Declined(String),
}

/// Result type alias for skaff operations
pub type SkaffResult<T> = Result<T, SkaffError>;
