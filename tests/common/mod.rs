#![allow(dead_code)]

use spz_tiles::{
    CancelToken, CommandLine, CommandRunner, Environment, Error, Platform, ProcessOutput, Result,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MVN: &str = "/opt/maven/bin/mvn";
pub const JAVA_HOME: &str = "/opt/jdk";
pub const JAVA: &str = "/opt/jdk/bin/java";

/// Environment with a configurable set of variables, executables and files.
#[derive(Clone, Debug, Default)]
pub struct FakeEnvironment {
    pub vars: HashMap<String, OsString>,
    pub executables: HashMap<String, PathBuf>,
    pub files: HashSet<PathBuf>,
}

impl FakeEnvironment {
    /// Maven on the path and a complete JDK.
    pub fn installed() -> Self {
        let mut env = Self::default();
        env.executables.insert("mvn".to_owned(), PathBuf::from(MVN));
        env.vars.insert("JAVA_HOME".to_owned(), JAVA_HOME.into());
        env.files.insert(PathBuf::from(JAVA));
        env
    }
}

impl Environment for FakeEnvironment {
    fn var(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).cloned()
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        self.executables.get(name).cloned()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn platform(&self) -> Platform {
        Platform::Unix
    }
}

/// Scripted result of a fake command.
#[derive(Clone, Debug)]
pub enum Response {
    Exit {
        code: i32,
        stdout: &'static str,
        stderr: &'static str,
    },
    Timeout,
    NotFound,
}

impl Response {
    pub fn ok() -> Self {
        Response::Exit {
            code: 0,
            stdout: "",
            stderr: "",
        }
    }

    pub fn fail(code: i32, stderr: &'static str) -> Self {
        Response::Exit {
            code,
            stdout: "",
            stderr,
        }
    }

    fn produce(&self, command: &CommandLine, timeout: Duration) -> Result<ProcessOutput> {
        match self {
            Response::Exit {
                code,
                stdout,
                stderr,
            } => Ok(ProcessOutput {
                code: Some(*code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            }),
            Response::Timeout => Err(Error::Timeout {
                program: command.program_name(),
                timeout,
            }),
            Response::NotFound => Err(Error::Launch {
                program: command.program.display().to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
        }
    }
}

/// Runner that answers the version query and the conversion with scripted responses
/// and records every command it was asked to run.
pub struct FakeRunner {
    pub version: Response,
    pub conversion: Response,
    pub calls: RefCell<Vec<(CommandLine, Duration)>>,
}

impl FakeRunner {
    pub fn new(version: Response, conversion: Response) -> Self {
        Self {
            version,
            conversion,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(Response::ok(), Response::ok())
    }

    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.borrow().iter().map(|(c, _)| c.clone()).collect()
    }

    /// Number of `exec:java` invocations seen so far.
    pub fn conversions(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.args.first().is_some_and(|a| a == "exec:java"))
            .count()
    }
}

impl CommandRunner for FakeRunner {
    fn run(
        &self,
        command: &CommandLine,
        timeout: Duration,
        _cancel: &CancelToken,
    ) -> Result<ProcessOutput> {
        self.calls.borrow_mut().push((command.clone(), timeout));
        if command.args.iter().any(|a| a == "--version") {
            self.version.produce(command, timeout)
        } else {
            self.conversion.produce(command, timeout)
        }
    }
}

/// Creates an empty SPZ file stand-in inside the directory.
pub fn spz_file(dir: &Path) -> PathBuf {
    let path = dir.join("bunny.spz");
    std::fs::write(&path, b"not really spz").unwrap();
    path
}
