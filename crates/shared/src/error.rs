#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
