use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("The file contains no rows with both a first and last name")]
    NoValidRows,

    #[error("Writing CSV: {0}")]
    Write(#[from] std::io::Error),
}
