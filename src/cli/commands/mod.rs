pub mod annotate;
pub mod extract;
pub mod init;

use crate::cli::exit_status::ExitStatus;

/// What a command accomplished, for the closing report and exit status.
#[derive(Debug, Default)]
pub struct CommandResult {
    pub files_scanned: usize,
    pub occurrences: usize,
    /// True when no resource file loaded and the built-in sample data is
    /// standing in. CI treats this as a failure signal.
    pub fell_back_to_defaults: bool,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        if self.fell_back_to_defaults {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}
