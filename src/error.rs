use std::fmt;

use thiserror::Error;

/// Identifying arguments attached to lookup and conflict errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(Vec<(&'static str, String)>);

impl Args {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{k}:{v}")?;
        }
        write!(f, "]")
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("repository does not exist: {args}")]
    NotFound { args: Args },

    #[error("repository already exists: {args}")]
    AlreadyExists { args: Args },

    #[error("repository name is not allowed: {name:?}")]
    NameNotAllowed { name: String },

    #[error("user does not have access to the repository")]
    Unauthorized,

    #[error("{stage}: {source}")]
    Store {
        stage: String,
        #[source]
        source: Box<Error>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Returns true if this error, or any error it wraps, marks a missing repository.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Store { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    pub fn is_already_exists(&self) -> bool {
        match self {
            Error::AlreadyExists { .. } => true,
            Error::Store { source, .. } => source.is_already_exists(),
            _ => false,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        match self {
            Error::Unauthorized => true,
            Error::Store { source, .. } => source.is_unauthorized(),
            _ => false,
        }
    }

    /// Returns true for a SQLite unique or primary key violation anywhere in the chain.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Error::Database(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.extended_code,
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            ),
            Error::Store { source, .. } => source.is_constraint_violation(),
            _ => false,
        }
    }

    /// The outermost stage label, if the error was wrapped by a store operation.
    pub fn stage(&self) -> Option<&str> {
        match self {
            Error::Store { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for labelling store failures with the step that produced them.
pub trait StageExt<T> {
    fn stage(self, stage: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> StageExt<T> for std::result::Result<T, E> {
    fn stage(self, stage: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Store {
            stage: stage.into(),
            source: Box::new(e.into()),
        })
    }
}
