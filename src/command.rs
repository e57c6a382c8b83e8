use crate::settings::Settings;
use std::ffi::OsString;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

/// External command to be executed by a runner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    /// Program to launch, either a bare name or a full path.
    pub program: PathBuf,

    /// Arguments passed to the program, one element per argv entry.
    pub args: Vec<OsString>,

    /// Working directory of the child process.
    /// The child inherits the working directory of the caller if not set.
    pub cwd: Option<PathBuf>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Short name of the program for messages.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Returns the `--version` query used to check that the build tool works.
    pub fn version_query(build_tool: &Path) -> Self {
        Self::new(build_tool).arg("--version")
    }

    /// Returns the Maven `exec:java` invocation of the converter class.
    ///
    /// The input and output paths must already be absolute,
    /// because Maven runs inside the project root and not inside the caller's directory.
    /// The three values are joined with spaces into the single `exec.args` property,
    /// which is how the plugin expects program arguments.
    pub fn conversion(
        build_tool: &Path,
        settings: &Settings,
        input: &Path,
        output_dir: &Path,
        content_name: &str,
    ) -> Self {
        let mut exec_args = OsString::from("-Dexec.args=");
        exec_args.push(input.as_os_str());
        exec_args.push(" ");
        exec_args.push(output_dir.as_os_str());
        exec_args.push(" ");
        exec_args.push(content_name);

        Self::new(build_tool)
            .arg("exec:java")
            .arg(format!("-Dexec.mainClass={}", settings.main_class))
            .arg(exec_args)
            .arg("-pl")
            .arg(&settings.module)
            .arg("-q")
            .current_dir(&settings.project_root)
    }
}

impl Display for CommandLine {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
