use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No se ha podido conectar con el servidor: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer; `message` is what the backend said, ready to show.
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Respuesta inesperada del servidor: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("API client has not been initialised")]
    NotConfigured,
}

pub type Result<T> = std::result::Result<T, ApiError>;
