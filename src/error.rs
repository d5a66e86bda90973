//! Host-boundary error types
//!
//! The simulation itself has no fallible paths; errors only arise where the
//! host hands us strings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadeError {
    /// Game id not in the registry
    #[error("unknown game: {0}")]
    UnknownGame(String),

    /// Settings JSON could not be parsed
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),

    /// HUD or frame could not be serialized
    #[error("encoding failed: {0}")]
    Encode(serde_json::Error),

    /// No game is mounted
    #[error("no game mounted")]
    NotMounted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ArcadeError::UnknownGame("frogger".into()).to_string(),
            "unknown game: frogger"
        );
        assert_eq!(ArcadeError::NotMounted.to_string(), "no game mounted");
    }
}
