//! Errors raised while turning an AST into reflection code.

use std::path::PathBuf;

/// Everything that can abort a generation run.
///
/// All of these are fatal: the run stops before any output is written.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An enum carrying the reflection marker has no items.
    #[error("enum `{name}` is marked for reflection but has no items")]
    EmptyEnum { name: String },

    /// An enumerator value fits neither `int64_t` nor `uint64_t`.
    #[error("enumerator `{item}` of enum `{name}` has value {value}, outside the 64-bit range")]
    EnumValueOutOfRange {
        name: String,
        item: String,
        value: i128,
    },

    /// A template does not contain one of the slots its kind requires.
    #[error("template `{template}` is missing placeholder `{placeholder}`")]
    MissingPlaceholder {
        template: String,
        placeholder: &'static str,
    },

    /// An AST document could not be decoded.
    #[error("failed to read AST document `{source_name}`: {source}")]
    Document {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The metadata summary could not be serialised.
    #[error("failed to serialise reflection metadata: {0}")]
    Metadata(#[source] serde_json::Error),

    /// A configuration file could not be decoded.
    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
