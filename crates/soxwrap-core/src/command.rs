//! Argument assembly for external tool invocations
//!
//! Argument vectors follow sox's invocation shape: global options, input
//! type flag, source path, output options, destination path, trailing
//! effect. Source and destination are typed placeholders substituted with
//! absolute paths when the command is rendered.

use std::ffi::OsString;
use std::path::Path;

/// One command-line element before path substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Arg {
    /// Placeholder for the resolved source path.
    Source,
    /// Placeholder for the destination path.
    Dest,
    /// A literal token passed through as-is.
    Lit(OsString),
}

/// An argument vector under construction.
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    args: Vec<Arg>,
}

impl CommandSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a caller-supplied option string, split on whitespace.
    /// Repeated blanks never produce empty argv entries.
    pub fn options(mut self, options: &str) -> Self {
        for token in options.split_whitespace() {
            self.args.push(Arg::Lit(OsString::from(token)));
        }
        self
    }

    /// Append the source placeholder.
    pub fn source(mut self) -> Self {
        self.args.push(Arg::Source);
        self
    }

    /// Append the destination placeholder.
    pub fn dest(mut self) -> Self {
        self.args.push(Arg::Dest);
        self
    }

    /// Append a literal path, for operations with more than one input.
    pub fn path(mut self, path: &Path) -> Self {
        self.args.push(Arg::Lit(path.as_os_str().to_os_string()));
        self
    }

    /// Substitute placeholders and yield the final argv. Placeholders
    /// without a supplied path are dropped.
    pub fn render(&self, source: Option<&Path>, dest: Option<&Path>) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            match arg {
                Arg::Source => {
                    if let Some(p) = source {
                        argv.push(p.as_os_str().to_os_string());
                    }
                }
                Arg::Dest => {
                    if let Some(p) = dest {
                        argv.push(p.as_os_str().to_os_string());
                    }
                }
                Arg::Lit(token) => argv.push(token.clone()),
            }
        }
        argv
    }
}
