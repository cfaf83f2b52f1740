use std::fmt;
use thiserror::Error;

/// Aborts the whole rule file load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read rule file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed rule file: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("root element <list> expected, found <{0}>")]
    UnexpectedRoot(String),
    #[error("<{element}> is missing attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
    #[error("invalid value '{value}' in <{element} stat=\"{stat}\">")]
    InvalidValue {
        element: String,
        stat: String,
        value: String,
    },
    #[error("unknown stat '{0}'")]
    UnknownStat(String),
    #[error("unknown olyMode '{0}'")]
    UnknownOlyMode(String),
}

/// Which id list a warning refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdKind {
    Class,
    TargetClass,
    Item,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdKind::Class => "class",
            IdKind::TargetClass => "target class",
            IdKind::Item => "item",
        })
    }
}

/// A problem the loader skipped over. The rest of the file is still used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseWarning {
    InvalidId {
        kind: IdKind,
        token: String,
        list: String,
    },
    NoValidIds {
        element: String,
        kind: IdKind,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::InvalidId { kind, token, list } => {
                write!(f, "invalid {kind} id '{token}' in '{list}'")
            }
            ParseWarning::NoValidIds { element, kind } => {
                write!(f, "<{element}> has no valid {kind} id, skipped")
            }
        }
    }
}
