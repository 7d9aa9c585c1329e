//! Error types returned by the encoder.

use thiserror::Error;

/// Error type for when data exceeds QR code capacity.
///
/// Ways to handle this error include:
///
/// - Decrease the error correction level if it was greater than `QrCodeEcc::Low`.
/// - Increase the maxversion argument if it was less than `Version::MAX`.
/// - Split the text data into better or optimal segments to reduce the number of bits required.
/// - Change the text or binary data to be shorter.
/// - Change the text to fit the character set of a particular segment mode (e.g. alphanumeric).
/// - Propagate the error upward to the caller/user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataTooLong {
    /// A segment's character count does not fit its count indicator, so the
    /// number of needed bits could not be computed.
    #[error("Segment too long")]
    SegmentTooLong,
    /// Data length (in bits) exceeds the capacity (in bits) of the largest allowed version.
    #[error("Data length = {0} bits, Max capacity = {1} bits")]
    DataOverCapacity(usize, usize),
}

/// Any failure reported by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    /// Malformed input to a public entry point. Nothing was computed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The payload does not fit in the allowed version range.
    #[error(transparent)]
    DataTooLong(#[from] DataTooLong),

    /// An internal precondition was violated. This indicates a bug in the
    /// encoder pipeline, not bad input.
    #[error("illegal state: {0}")]
    State(String),
}

impl QrError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        QrError::InvalidArgument(msg.into())
    }

    pub(crate) fn state(msg: impl Into<String>) -> Self {
        QrError::State(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_too_long_messages() {
        assert_eq!(DataTooLong::SegmentTooLong.to_string(), "Segment too long");
        assert_eq!(
            DataTooLong::DataOverCapacity(23652, 23648).to_string(),
            "Data length = 23652 bits, Max capacity = 23648 bits"
        );
    }

    #[test]
    fn test_data_too_long_is_transparent() {
        let err: QrError = DataTooLong::DataOverCapacity(10, 8).into();
        assert_eq!(err.to_string(), "Data length = 10 bits, Max capacity = 8 bits");
        assert!(matches!(err, QrError::DataTooLong(DataTooLong::DataOverCapacity(10, 8))));
    }
}
