use crate::api::Error as ApiError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// The single line to show the user: the api error itself, or the whole
    /// context chain of a gateway failure, eg. "Failed to create category:
    /// Slug already used algebra"
    pub fn message(&self) -> String {
        match self {
            Error::Anyhow(err) => format!("{err:#}"),
            Error::Api(err) => err.to_string(),
        }
    }

    /// The api error reported by the server or raised by validation, if any
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Anyhow(err) => err.chain().find_map(|e| e.downcast_ref::<ApiError>()),
            Error::Api(err) => Some(err),
        }
    }
}
