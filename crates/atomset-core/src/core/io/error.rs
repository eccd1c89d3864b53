use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Can only write pdb or gro, got '{path}'")]
    UnsupportedFormat { path: String },
}
