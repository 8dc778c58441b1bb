//! Errors raised while bringing the tracking device up.
//!
//! Only startup can fail. Once the tick loop is running, a missing frame is a
//! `false` from `JointSource::poll_joints`, never an error.

/// Errors that abort startup before the tick loop begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The device (or its stand-in) could not be opened
    NotConnected(String),
    /// No valid skeleton frame arrived while calibrating
    CalibrationUnavailable {
        /// Polls attempted before giving up
        attempts: u32,
    },
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceError::NotConnected(msg) => write!(f, "Tracking device not connected: {}", msg),
            DeviceError::CalibrationUnavailable { attempts } => write!(
                f,
                "No skeleton frame for calibration after {} polls",
                attempts
            ),
        }
    }
}

impl std::error::Error for DeviceError {}

/// Result type for device startup operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = DeviceError::NotConnected("sensor offline".into());
        assert_eq!(err.to_string(), "Tracking device not connected: sensor offline");

        let err = DeviceError::CalibrationUnavailable { attempts: 30 };
        assert_eq!(
            err.to_string(),
            "No skeleton frame for calibration after 30 polls"
        );
    }
}
