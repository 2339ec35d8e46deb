#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `deltasync` command-line front-end. It parses the
//! argument list with a [`clap`](https://docs.rs/clap/) command definition,
//! installs the tracing subscriber for the requested verbosity, and
//! dispatches to the [`engine`] entry points:
//!
//! - `sync SRC DEST [--output PATH] [--chunk-size N]` runs a local exchange.
//! - `delta SRC REFERENCE --batch FILE [--chunk-size N]` records a batch.
//! - `patch REFERENCE --batch FILE [--output PATH]` applies a batch.
//!
//! # Exit status
//!
//! [`run`] returns `0` on success, `1` when the operation fails, and `2` for
//! usage errors. [`exit_code_from`] converts the status for `main`.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::run(["deltasync", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(status, 0);
//! assert!(String::from_utf8_lossy(&stdout).starts_with("deltasync"));
//! ```

mod command;
mod execute;

use std::ffi::OsString;
use std::io::Write;

use clap::error::ErrorKind;

pub use command::PROGRAM_NAME;

/// Exit status for a successful run.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status when the requested operation failed.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status for invalid command lines.
pub const EXIT_USAGE: i32 = 2;

/// Runs the CLI with the provided arguments and output handles, returning
/// the process exit status.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match command::parse_args(arguments) {
        Ok(parsed) => {
            logging::init_tracing(&logging::VerbosityConfig::from_verbose_level(parsed.verbose));
            match execute::execute(&parsed, stdout) {
                Ok(()) => EXIT_SUCCESS,
                Err(message) => {
                    let _ = writeln!(stderr, "{PROGRAM_NAME}: {message}");
                    EXIT_FAILURE
                }
            }
        }
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = write!(stdout, "{error}");
                EXIT_SUCCESS
            }
            _ => {
                let _ = write!(stderr, "{error}");
                EXIT_USAGE
            }
        },
    }
}

/// Converts a numeric exit status into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, i32::from(u8::MAX));
    std::process::ExitCode::from(clamped as u8)
}
