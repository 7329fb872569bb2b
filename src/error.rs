use thiserror::Error;

pub type FinderResult<T> = Result<T, FinderError>;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("point index {index} is out of range for a table of {len} stars")]
    UnknownPointIndex { index: usize, len: usize },

    #[error("plot surface has been torn down")]
    SurfaceClosed,

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
