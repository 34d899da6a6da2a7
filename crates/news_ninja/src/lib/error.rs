#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Broadcast composition failed: {0}")]
    Composition(String),
    #[error("Audio generation failed")]
    Rendering,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
