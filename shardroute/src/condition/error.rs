use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing parameter: {0}")]
    MissingParameter(usize),
}
