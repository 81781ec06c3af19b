use std::process::ExitCode;

/// Outcome of a command, turned into the process exit code by the caller.
#[derive(Debug)]
pub struct Exit {
    success: bool,
    message: Option<String>,
}

impl Exit {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn error() -> Self {
        Self {
            success: false,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Print the message and return the exit code. Success messages are
    /// suppressed by `quiet`.
    pub fn report(self, quiet: bool) -> ExitCode {
        match (self.success, self.message) {
            (true, Some(message)) if !quiet => println!("{message}"),
            (false, Some(message)) => eprintln!("{message}"),
            _ => {}
        }

        if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}
