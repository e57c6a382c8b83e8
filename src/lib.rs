//! Runs the Java SPZ to glTF/3D Tiles converter through Maven.
//!
//! The conversion itself happens in the external class
//! `de.javagl.jspz.examples.SpzToTileset`.
//! This crate checks that Maven and Java are usable, builds the
//! `mvn exec:java` command line, runs it with a timeout and reports the outcome
//! as a list of typed lines plus a typed result.
//!
//! ```no_run
//! use spz_tiles::{ConversionRequest, Converter, Settings};
//!
//! let converter = Converter::new(Settings::with_project_root("/path/to/jspz"));
//! let request = ConversionRequest::new("bunny.spz", "tiles", None);
//! let report = converter.convert(&request);
//! for line in report.lines() {
//!     println!("{line}");
//! }
//! ```

#![forbid(unsafe_code)]

mod command;
mod converter;
mod environment;
mod error;
mod prerequisites;
mod report;
mod request;
mod runner;
mod settings;

pub use self::command::CommandLine;
pub use self::converter::Converter;
pub use self::environment::{Environment, Platform, SystemEnvironment};
pub use self::error::{BoxedError, Error, PrerequisiteCheck, Result};
pub use self::prerequisites::{check_prerequisites, Toolchain};
pub use self::report::{ConversionOutput, ConversionReport, Level, LogLine};
pub use self::request::{
    resolve_content_name, ConversionRequest, DEFAULT_CONTENT_NAME, TILESET_FILE_NAME,
};
pub use self::runner::{CancelToken, CommandRunner, ProcessOutput, SystemRunner};
pub use self::settings::{
    Settings, CHECK_TIMEOUT, CONVERSION_TIMEOUT, MAIN_CLASS, MODULE, RUNTIME_HOME_VAR,
};
