use crate::command::CommandLine;
use crate::environment::Environment;
use crate::error::PrerequisiteCheck;
use crate::runner::{CancelToken, CommandRunner};
use crate::settings::Settings;
use crate::Error;
use crate::Result;
use log::debug;
use std::path::{Path, PathBuf};

/// Resolved locations of the external tools.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolchain {
    /// Full path of the Maven launcher.
    pub build_tool: PathBuf,

    /// Full path of the Java launcher.
    pub runtime: PathBuf,
}

/// Verifies that Maven and Java are installed and usable.
///
/// The checks run in a fixed order and the first failing one is returned:
/// Maven on the search path, the runtime home variable,
/// the Java executable below it and finally a `--version` query of Maven.
pub fn check_prerequisites<E, R>(env: &E, runner: &R, settings: &Settings) -> Result<Toolchain>
where
    E: Environment + ?Sized,
    R: CommandRunner + ?Sized,
{
    let platform = env.platform();

    let tool_name = platform.build_tool();
    let build_tool = env
        .find_executable(tool_name)
        .ok_or_else(|| Error::MissingDependency {
            check: PrerequisiteCheck::BuildTool,
            reason: format!(
                "Maven ({tool_name}) not found in PATH. Please install Maven and add it to PATH."
            ),
        })?;
    debug!("Found build tool at {}", build_tool.display());

    let var = &settings.runtime_home_var;
    let runtime_home = env
        .var(var)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::InvalidEnvironment {
            variable: var.clone(),
            reason: format!(
                "{var} environment variable is not set. Please set {var} to your JDK installation."
            ),
        })?;

    let runtime = Path::new(&runtime_home)
        .join("bin")
        .join(platform.runtime_executable());
    if !env.is_file(&runtime) {
        return Err(Error::MissingDependency {
            check: PrerequisiteCheck::RuntimeExecutable,
            reason: format!(
                "Java executable not found at {}. Please check {var} setting.",
                runtime.display()
            ),
        });
    }
    debug!("Found runtime at {}", runtime.display());

    let query = CommandLine::version_query(&build_tool);
    let self_test = |reason: String| Error::MissingDependency {
        check: PrerequisiteCheck::BuildToolSelfTest,
        reason: format!("Maven test failed: {reason}"),
    };
    match runner.run(&query, settings.check_timeout, &CancelToken::new()) {
        Ok(output) if output.success() => {}
        Ok(output) => {
            let stderr = output.stderr.trim_end();
            let reason = if stderr.is_empty() {
                match output.code {
                    Some(code) => format!("exited with code {code}"),
                    None => "terminated by a signal".to_owned(),
                }
            } else {
                stderr.to_owned()
            };
            return Err(self_test(reason));
        }
        Err(err) => return Err(self_test(err.to_string())),
    }

    Ok(Toolchain {
        build_tool,
        runtime,
    })
}
