use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid keyframe schedule for {element}: {reason}")]
    InvalidSchedule { element: String, reason: String },

    #[error("Invalid section {section}: {reason}")]
    InvalidSection { section: String, reason: String },

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn schedule(element: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidSchedule {
            element: element.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn section(section: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidSection {
            section: section.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
