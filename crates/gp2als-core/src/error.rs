use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error(
        "{} is not a compressed Live set (expected magic bytes 1f 8b, found {magic:02x?})",
        path.display()
    )]
    Format { path: PathBuf, magic: Vec<u8> },

    #[error("unsupported document layout: missing <{element}> element")]
    Structure { element: String },

    #[error("there are no rehearsal marks to import")]
    EmptyInput,

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("invalid measure number: {value:?}")]
    InvalidBar { value: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn structure(element: &str) -> Self {
        Self::Structure {
            element: element.to_string(),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
