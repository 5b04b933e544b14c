use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error set shared by the scheduling core, the stores and the terminal front end.
#[derive(Error, Debug)]
pub enum Error {
    // ---- Input --------------------------------------------------------------
    /// Form-level problems caught before any store call (empty or duplicate fields).
    #[error("{0}")]
    Validation(String),

    /// Token or value that could not be parsed (dates, shifts, roles, ...).
    #[error("Parse error: {0}")]
    Parse(String),

    /// No resolver matched the command word.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    // ---- Collaborators ------------------------------------------------------
    /// Credential check or identity provider failure.
    #[error("{0}")]
    Auth(String),

    /// Document or schedule store failure; the message is shown as-is.
    #[error("Store error: {0}")]
    Store(String),

    /// Blob upload failure.
    #[error("Upload failed: {0}")]
    Upload(String),

    // ---- Routing ------------------------------------------------------------
    /// The requested view is not reachable from the current router state.
    #[error("Cannot open '{view}': {reason}")]
    Navigation { view: String, reason: String },

    // ---- Config -------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing configuration item: {item}")]
    ConfigItemMissing { item: &'static str },

    // ---- Plumbing -----------------------------------------------------------
    #[error("{0}")]
    Domain(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }
    pub fn auth<S: Into<String>>(msg: S) -> Self {
        Error::Auth(msg.into())
    }
    pub fn store<S: Into<String>>(msg: S) -> Self {
        Error::Store(msg.into())
    }
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }
    pub fn domain<S: Into<String>>(msg: S) -> Self {
        Error::Domain(msg.into())
    }
    pub fn unknown<S: Into<String>>(cmd: S) -> Self {
        Error::UnknownCommand(cmd.into())
    }
    pub fn navigation<V: Into<String>, R: Into<String>>(view: V, reason: R) -> Self {
        Error::Navigation {
            view: view.into(),
            reason: reason.into(),
        }
    }
}

/// Map an `Option<T>` into `Result<T, Error::Parse>` with a custom message.
pub fn require_parse<T, S: Into<String>>(opt: Option<T>, msg: S) -> Result<T> {
    opt.ok_or_else(|| Error::Parse(msg.into()))
}

/// Map an `Option<T>` into `Result<T, Error::ConfigItemMissing>` with a static key.
pub fn require_config_item<T>(opt: Option<T>, item: &'static str) -> Result<T> {
    opt.ok_or_else(|| Error::ConfigItemMissing { item })
}
