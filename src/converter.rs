use crate::command::CommandLine;
use crate::environment::{Environment, SystemEnvironment};
use crate::error::ErrorConverter;
use crate::prerequisites::{check_prerequisites, Toolchain};
use crate::report::{ConversionOutput, ConversionReport, Journal, LogLine};
use crate::request::{ConversionRequest, TILESET_FILE_NAME};
use crate::runner::{CancelToken, CommandRunner, SystemRunner};
use crate::settings::Settings;
use crate::Error;
use crate::Result;
use log::{debug, warn};
use std::fs::create_dir_all;
use std::path::{absolute, Path};

/// Runs the external SPZ to tileset conversion.
///
/// The environment and the runner are injected so that tests can fake
/// any installation state and any process outcome.
#[derive(Clone, Debug)]
pub struct Converter<E = SystemEnvironment, R = SystemRunner> {
    env: E,
    runner: R,
    settings: Settings,
}

impl Converter {
    /// Creates a converter working on the real process environment.
    pub fn new(settings: Settings) -> Self {
        Self::with_parts(SystemEnvironment, SystemRunner, settings)
    }
}

impl<E: Environment, R: CommandRunner> Converter<E, R> {
    pub fn with_parts(env: E, runner: R, settings: Settings) -> Self {
        Self {
            env,
            runner,
            settings,
        }
    }

    /// Verifies that Maven and Java are available.
    pub fn check_prerequisites(&self) -> Result<Toolchain> {
        check_prerequisites(&self.env, &self.runner, &self.settings)
    }

    /// Converts a single SPZ file and collects the report.
    pub fn convert(&self, request: &ConversionRequest) -> ConversionReport {
        self.convert_with(request, &CancelToken::new(), |_| {})
    }

    /// Converts a single SPZ file.
    ///
    /// Every report line is passed to `sink` as soon as it is produced,
    /// the same lines are also part of the returned report.
    /// Cancelling the token kills the external process.
    pub fn convert_with<F>(
        &self,
        request: &ConversionRequest,
        cancel: &CancelToken,
        mut sink: F,
    ) -> ConversionReport
    where
        F: FnMut(&LogLine),
    {
        let mut journal = Journal::new(&mut sink);
        let result = self.run_conversion(request, cancel, &mut journal);
        if let Err(err) = &result {
            report_error(&mut journal, err);
        }
        journal.finish(result)
    }

    fn run_conversion(
        &self,
        request: &ConversionRequest,
        cancel: &CancelToken,
        journal: &mut Journal,
    ) -> Result<ConversionOutput> {
        let toolchain = self.check_prerequisites()?;

        if !request.input.exists() {
            return Err(Error::InvalidInput {
                reason: format!(
                    "Input file '{}' does not exist",
                    request.input.display()
                ),
            });
        }

        create_dir_all(&request.output_dir).unexpected_err(format!(
            "Failed to create output directory '{}'",
            request.output_dir.display()
        ))?;

        // The build tool runs inside the project root, relative paths would point elsewhere
        let input = absolute(&request.input).unexpected_err("Failed to resolve input path")?;
        let output_dir =
            absolute(&request.output_dir).unexpected_err("Failed to resolve output path")?;
        warn_on_whitespace(&input, &output_dir, &request.content_name);

        let command = CommandLine::conversion(
            &toolchain.build_tool,
            &self.settings,
            &input,
            &output_dir,
            &request.content_name,
        );

        journal.info(format!(
            "Converting {} to {}...",
            request.input.display(),
            request.output_dir.display()
        ));
        journal.info(format!("Running: {command}"));
        debug!(
            "Conversion runs in {} with a timeout of {:?}",
            self.settings.project_root.display(),
            self.settings.conversion_timeout
        );

        let output = self
            .runner
            .run(&command, self.settings.conversion_timeout, cancel)?;
        if !output.success() {
            return Err(Error::ProcessFailed {
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        let output = ConversionOutput {
            tileset: output_dir.join(TILESET_FILE_NAME),
            content: output_dir.join(&request.content_name),
        };
        journal.success("✓ Conversion completed successfully!");
        journal.info("  Output files:");
        journal.info(format!("    - {}", output.tileset.display()));
        journal.info(format!("    - {}", output.content.display()));
        Ok(output)
    }
}

fn report_error(journal: &mut Journal, err: &Error) {
    match err {
        Error::MissingDependency { .. } | Error::InvalidEnvironment { .. } => {
            journal.failure(format!("✗ Prerequisites check failed: {err}"));
        }
        Error::InvalidInput { .. } => journal.failure(format!("✗ {err}")),
        Error::ProcessFailed {
            code,
            stdout,
            stderr,
        } => {
            journal.failure("✗ Conversion failed!");
            match code {
                Some(code) => journal.failure(format!("Return code: {code}")),
                None => journal.failure("Return code: none (terminated by signal)"),
            }
            if !stdout.is_empty() {
                journal.failure(format!("Standard output: {stdout}"));
            }
            if !stderr.is_empty() {
                journal.failure(format!("Error output: {stderr}"));
            }
        }
        Error::Timeout { timeout, .. } => journal.failure(format!(
            "✗ Conversion timed out after {}",
            describe_duration(timeout.as_secs())
        )),
        Error::Cancelled => journal.failure("✗ Conversion cancelled"),
        Error::Launch { .. } => journal.failure(format!("✗ Command not found: {err}")),
        Error::Unexpected { .. } => journal.failure(format!("✗ Unexpected error: {err}")),
    }
}

fn describe_duration(secs: u64) -> String {
    match secs {
        1 => "1 second".to_owned(),
        60 => "1 minute".to_owned(),
        s if s > 60 && s % 60 == 0 => format!("{} minutes", s / 60),
        s => format!("{s} seconds"),
    }
}

// exec.args is split on whitespace by the exec plugin
fn warn_on_whitespace(input: &Path, output_dir: &Path, content_name: &str) {
    let values: [(&str, String); 3] = [
        ("input path", input.display().to_string()),
        ("output path", output_dir.display().to_string()),
        ("content name", content_name.to_owned()),
    ];
    for (what, value) in values {
        if value.contains(char::is_whitespace) {
            warn!("The {what} '{value}' contains whitespace and may be split by Maven");
        }
    }
}
