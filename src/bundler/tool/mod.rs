//! External tool invocation.
//!
//! Argument construction and process execution are kept apart: platform
//! modules build [`BuildStep`] values, and a [`ToolRunner`] executes them.
//! The only success signal for a step is the presence of its expected output
//! file, since several devkitPro tools exit non-zero on mere warnings.

mod detection;
mod runner;

pub use detection::missing_tools;
pub use runner::{DEFAULT_TOOL_TIMEOUT, ProcessRunner};

use crate::bundler::error::Result;
use std::{
    fmt,
    future::Future,
    path::{Path, PathBuf},
};

/// One external tool invocation and the file it must produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    /// Program name or path.
    pub program: PathBuf,
    /// Arguments, passed verbatim without a shell.
    pub args: Vec<String>,
    /// File whose existence marks the step as successful.
    pub output: PathBuf,
}

impl BuildStep {
    pub fn new(program: PathBuf, output: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            output,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    /// `--<flag>=<path>` style argument.
    pub fn flag_arg(self, flag: &str, path: &Path) -> Self {
        self.arg(format!("--{flag}={}", path.display()))
    }

    /// Short program name for log lines and error messages.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Executes build steps.
///
/// Implementations must report [`Error::ProcessLaunchFailure`] when the
/// program cannot be started and [`Error::OutputMissing`] when the expected
/// output is absent afterward.
///
/// [`Error::ProcessLaunchFailure`]: crate::bundler::Error::ProcessLaunchFailure
/// [`Error::OutputMissing`]: crate::bundler::Error::OutputMissing
pub trait ToolRunner: Send + Sync + 'static {
    fn run(&self, step: &BuildStep) -> impl Future<Output = Result<()>> + Send;
}

/// Resolves devkitPro tool names to programs.
///
/// Without a tools directory, names are looked up on `PATH` by the OS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toolchain {
    tools_dir: Option<PathBuf>,
}

impl Toolchain {
    /// Tools resolved through `PATH`.
    pub fn system() -> Self {
        Self::default()
    }

    /// Tools resolved inside `dir`, e.g. `/opt/devkitpro/tools/bin`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            tools_dir: Some(dir.into()),
        }
    }

    pub fn tools_dir(&self) -> Option<&Path> {
        self.tools_dir.as_deref()
    }

    pub fn program(&self, name: &str) -> PathBuf {
        match &self.tools_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}
