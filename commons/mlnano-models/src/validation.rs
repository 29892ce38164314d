#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}
