use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("signing error: {0}")]
    Sign(#[from] hola::SignError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
