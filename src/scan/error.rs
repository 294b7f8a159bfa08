use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read html: {0}")]
    Io(#[from] std::io::Error),

    #[error("html ended before </head>")]
    UnexpectedEof,
}
