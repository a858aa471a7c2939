use thiserror::Error;

/// Failure reported by a motor driver
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Hardware(String),
}

/// Why a command request was not executed
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Comando no reconocido")]
    Validation(String),

    #[error("Error interno del motor: {0}")]
    Actuation(#[from] DriverError),
}

impl DispatchError {
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::Validation(_) => 400,
            DispatchError::Actuation(_) => 500,
        }
    }
}

/// Client-side send failure
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server answered {status}: {message}")]
    Rejected { status: u16, message: String },
}
