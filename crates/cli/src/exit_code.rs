//! Process exit codes

/// Exit status reported by the `webotron` binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    /// Unclassified failure
    GeneralError = 1,
    /// Bad arguments, missing local path, or invalid configuration
    UsageError = 2,
    /// Provider unreachable or returned an unrecognized error
    NetworkError = 3,
    /// Credentials missing or not permitted
    AuthError = 4,
    /// Bucket or object does not exist
    NotFound = 5,
    /// Bucket name already taken
    Conflict = 6,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::NetworkError),
            4 => Some(Self::AuthError),
            5 => Some(Self::NotFound),
            6 => Some(Self::Conflict),
            _ => None,
        }
    }

    /// Exit code for a library error
    pub fn from_error(error: &webotron_core::Error) -> Self {
        Self::from_i32(error.exit_code()).unwrap_or(Self::GeneralError)
    }
}
