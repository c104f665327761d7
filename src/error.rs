//! Error types shared by the playlist components.
//!
//! Positional operations fail with [`PlaylistError::OutOfRange`] before any
//! link is touched, so a failed call never leaves a container half-modified.
//! Empty results (nothing to undo, no bucket for a rating, fewer favourites
//! than requested) are not errors and are reported through `Option` or an
//! empty `Vec` instead.

use thiserror::Error;

/// Errors raised by the core containers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaylistError {
    /// A position outside `[0, len)` was requested.
    #[error("index {index} out of range for playlist of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// A rating outside the 1-5 domain.
    #[error("rating {0} is outside the allowed range 1-5")]
    InvalidRating(u8),

    /// No track with this identifier is registered.
    #[error("no track registered with id `{0}'")]
    UnknownTrack(String),
}

/// Convenience alias for results carrying a [`PlaylistError`].
pub type Result<T> = std::result::Result<T, PlaylistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = PlaylistError::OutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 out of range for playlist of length 3");
    }

    #[test]
    fn test_invalid_rating_message() {
        assert!(PlaylistError::InvalidRating(9).to_string().contains("1-5"));
    }
}
