//! Command outcomes and process exit codes

/// Unexpected failure: bad invocation, configuration, or remote error
pub const EXIT_FAILURE: i32 = 1;

/// How a command that ran to completion ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The named group, module or installed module does not exist
    NotFound,
    /// The module name matched several projects
    Ambiguous,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::NotFound => 2,
            Outcome::Ambiguous => 3,
        }
    }
}
