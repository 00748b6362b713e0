use crate::api::Error;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to reach the server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Api(#[from] Error),

    #[error("Server answered with unexpected status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

impl ClientError {
    /// Text fit for showing to the user
    pub fn message(&self) -> String {
        match self {
            ClientError::Transport(e) if e.is_timeout() => {
                String::from("The server took too long to answer")
            }
            ClientError::Transport(e) if e.is_connect() => {
                String::from("Could not connect to the server")
            }
            e => e.to_string(),
        }
    }
}
