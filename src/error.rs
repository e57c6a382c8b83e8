use std::error::Error as StdError;
use std::fmt::Result as FmtResult;
use std::fmt::{Display, Formatter};
use std::io;
use std::result::Result as StdResult;
use std::time::Duration;

/// Boxed source error that can travel to another thread.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Identifies which prerequisite check failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrerequisiteCheck {
    /// The build tool executable was not found on the search path.
    BuildTool,
    /// The runtime installation variable is not set.
    RuntimeHome,
    /// The runtime executable is missing below the installation directory.
    RuntimeExecutable,
    /// The build tool did not answer the version query successfully.
    BuildToolSelfTest,
}

/// Possible errors that can occur while preparing or running a conversion.
#[derive(Debug)]
pub enum Error {
    /// A required tool or runtime is missing or broken.
    MissingDependency {
        check: PrerequisiteCheck,
        reason: String,
    },
    /// A required environment variable is not set.
    InvalidEnvironment { variable: String, reason: String },
    /// The caller supplied an unusable input, for example a missing input file.
    InvalidInput { reason: String },
    /// The external command ran but returned a non-zero exit status.
    /// The exit code is missing when the process was terminated by a signal.
    ProcessFailed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// The external command exceeded its time budget and was killed.
    Timeout { program: String, timeout: Duration },
    /// The external command was cancelled by the caller and was killed.
    Cancelled,
    /// The external command could not be launched because its executable was not found.
    Launch { program: String, source: io::Error },
    /// Anything else that went wrong.
    Unexpected {
        reason: String,
        source: Option<BoxedError>,
    },
}

impl Error {
    /// Creates an unexpected error from text.
    pub fn unexpected<T>(reason: &str) -> Result<T> {
        Err(Error::Unexpected {
            reason: reason.to_string(),
            source: None,
        })
    }

    /// Returns the failed prerequisite check, if this error came from one.
    pub fn prerequisite(&self) -> Option<PrerequisiteCheck> {
        match self {
            Error::MissingDependency { check, .. } => Some(*check),
            Error::InvalidEnvironment { .. } => Some(PrerequisiteCheck::RuntimeHome),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Error::MissingDependency { reason, .. } => write!(f, "{reason}"),
            Error::InvalidEnvironment { reason, .. } => write!(f, "{reason}"),
            Error::InvalidInput { reason } => write!(f, "{reason}"),
            Error::ProcessFailed { code: Some(code), .. } => {
                write!(f, "Process exited with code {code}")
            }
            Error::ProcessFailed { code: None, .. } => {
                write!(f, "Process was terminated by a signal")
            }
            Error::Timeout { program, timeout } => write!(
                f,
                "Command '{program}' timed out after {} seconds",
                timeout.as_secs()
            ),
            Error::Cancelled => write!(f, "Command was cancelled"),
            Error::Launch { program, source } => write!(f, "{program}: {source}"),
            Error::Unexpected {
                reason,
                source: Some(source),
            } => write!(f, "{reason}: {source}"),
            Error::Unexpected { reason, .. } => write!(f, "{reason}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Launch { source, .. } => Some(source),
            Error::Unexpected { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn StdError + 'static)),
            _ => None,
        }
    }
}

pub type Result<T> = StdResult<T, Error>;

/// Helper trait for results that can be converted into an unexpected Error.
pub trait ErrorConverter<T> {
    fn unexpected_err<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;
}

impl<T, E> ErrorConverter<T> for StdResult<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn unexpected_err<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|error| Error::Unexpected {
            reason: context.to_string(),
            source: Some(Box::new(error)),
        })
    }
}
