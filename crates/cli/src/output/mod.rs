//! Output formatting
//!
//! Human-readable or JSON output, selected by global flags.

mod formatter;

pub use formatter::Formatter;

/// Output settings shared by every command
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Emit JSON instead of human-readable text
    pub json: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Suppress everything except errors
    pub quiet: bool,
}
