pub type GridArtResult<T> = Result<T, GridArtError>;

/// Coarse classification of a failure, used by callers deciding whether to resume a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    Rasterization,
    Io,
}

#[derive(thiserror::Error, Debug)]
pub enum GridArtError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("rasterization failed: {0}")]
    Rasterization(String),

    #[error("io error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("item {index} failed")]
    Item {
        index: u64,
        #[source]
        source: Box<GridArtError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GridArtError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::Rasterization(msg.into())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wrap `self` as the failure of batch item `index`.
    pub fn at_item(self, index: u64) -> Self {
        Self::Item {
            index,
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Rasterization(_) => ErrorKind::Rasterization,
            Self::Io { .. } => ErrorKind::Io,
            Self::Item { source, .. } => source.kind(),
            Self::Other(e) => {
                if e.chain().any(|c| c.is::<std::io::Error>()) {
                    ErrorKind::Io
                } else {
                    ErrorKind::Rasterization
                }
            }
        }
    }

    /// Index of the batch item that failed, if this error came out of a batch loop.
    pub fn failed_index(&self) -> Option<u64> {
        match self {
            Self::Item { index, .. } => Some(*index),
            _ => None,
        }
    }
}
