use std::path::PathBuf;
use std::time::Duration;

/// Fully qualified name of the Java class that performs the conversion.
pub const MAIN_CLASS: &str = "de.javagl.jspz.examples.SpzToTileset";

/// Maven module that contains the main class.
pub const MODULE: &str = "jspz-main";

/// Environment variable pointing to the JDK installation.
pub const RUNTIME_HOME_VAR: &str = "JAVA_HOME";

/// Time budget for the `--version` self-test of the build tool.
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(30);

/// Time budget for the actual conversion.
pub const CONVERSION_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration of the conversion invocation.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Root of the Maven project, used as working directory of the build tool.
    pub project_root: PathBuf,

    /// Java class executed through `exec:java`.
    pub main_class: String,

    /// Maven module selected with `-pl`.
    pub module: String,

    /// Name of the variable holding the runtime installation directory.
    pub runtime_home_var: String,

    /// Time budget for the build tool self-test.
    pub check_timeout: Duration,

    /// Time budget for the conversion command.
    pub conversion_timeout: Duration,
}

impl Settings {
    /// Default settings with a different project root.
    pub fn with_project_root(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            main_class: MAIN_CLASS.to_owned(),
            module: MODULE.to_owned(),
            runtime_home_var: RUNTIME_HOME_VAR.to_owned(),
            check_timeout: CHECK_TIMEOUT,
            conversion_timeout: CONVERSION_TIMEOUT,
        }
    }
}
