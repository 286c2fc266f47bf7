use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid period '{0}': expected YYYY-MM")]
    InvalidPeriod(String),
}
