//! Builder for running external tool commands and capturing their text.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::Result;

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status. Recorded, never used to decide success.
    pub status: ExitStatus,
    /// Standard output followed by standard error, line by line, joined with
    /// `\n`.
    pub text: String,
}

/// A builder for constructing and executing external tool invocations.
///
/// Arguments are handed to the process directly, so paths never need shell
/// quoting. Stdin is closed so a tool never waits on a prompt.
///
/// # Example
///
/// ```no_run
/// use ffmovie_av::ToolCommand;
///
/// let output = ToolCommand::new("ffmpeg")
///     .arg("-i")
///     .arg("/path/to/video.mkv")
///     .execute()?;
/// println!("{}", output.text);
/// # Ok::<(), ffmovie_av::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<OsString>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<OsString>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// The program this command runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments as lossy strings, for logging and tests.
    pub fn display_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    /// Execute the command and block until it exits.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the process cannot be spawned. A
    /// non-zero exit status is not an error.
    pub fn execute(&self) -> Result<ToolOutput> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            program = %self.program.display(),
            args = ?self.display_args(),
            "Running external tool"
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let text = stdout
            .lines()
            .chain(stderr.lines())
            .collect::<Vec<_>>()
            .join("\n");

        #[cfg(feature = "tracing")]
        tracing::debug!(
            program = %self.program.display(),
            status = %output.status,
            bytes = text.len(),
            "External tool finished"
        );

        Ok(ToolOutput {
            status: output.status,
            text,
        })
    }
}
