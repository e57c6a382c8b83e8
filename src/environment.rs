use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Operating system family, as far as executable naming is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// Platform of the running process.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// File name of the Maven launcher.
    pub fn build_tool(self) -> &'static str {
        match self {
            Platform::Windows => "mvn.cmd",
            Platform::Unix => "mvn",
        }
    }

    /// File name of the Java launcher inside `$JAVA_HOME/bin`.
    pub fn runtime_executable(self) -> &'static str {
        match self {
            Platform::Windows => "java.exe",
            Platform::Unix => "java",
        }
    }
}

/// Access to the process environment.
///
/// Prerequisite checks only look at the outside world through this trait,
/// so tests can describe any installation state without touching the real
/// environment of the test process.
pub trait Environment {
    /// Value of an environment variable, if set.
    fn var(&self, key: &str) -> Option<OsString>;

    /// Full path of an executable found on the search path.
    fn find_executable(&self, name: &str) -> Option<PathBuf>;

    /// True if the path points to an existing file.
    fn is_file(&self, path: &Path) -> bool;

    fn platform(&self) -> Platform {
        Platform::current()
    }
}

/// The real environment of the running process.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<OsString> {
        env::var_os(key)
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        search_path(&env::var_os("PATH")?, name)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Relative entries are resolved against the current directory,
/// the command may later run somewhere else.
fn search_path(paths: &OsStr, name: &str) -> Option<PathBuf> {
    env::split_paths(paths)
        .map(|dir| dir.join(name))
        .filter(|candidate| is_executable(candidate))
        .find_map(|candidate| std::path::absolute(candidate).ok())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

impl<T: Environment + ?Sized> Environment for &T {
    fn var(&self, key: &str) -> Option<OsString> {
        (**self).var(key)
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        (**self).find_executable(name)
    }

    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }

    fn platform(&self) -> Platform {
        (**self).platform()
    }
}
