/*
 * Command line and desktop front end for the Java SPZ to glTF tileset converter.
 *
 * The conversion is done by the class de.javagl.jspz.examples.SpzToTileset,
 * started through "mvn exec:java" inside the Maven project root.
 * Maven has to be on the PATH and JAVA_HOME has to point to a JDK.
 *
 * The output directory receives a "tileset.json" and the binary glTF content file.
 * The window is only available when built with the "gui" feature.
 */

#[cfg(any(feature = "gui", test))]
mod form;
#[cfg(feature = "gui")]
mod gui;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use spz_tiles::{CancelToken, ConversionRequest, Converter, Level, Settings};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Convert SPZ files to glTF tilesets for Cesium
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Launch the graphical interface
    #[arg(long)]
    gui: bool,

    /// Input SPZ file
    input_file: Option<PathBuf>,

    /// Output directory
    output_dir: Option<PathBuf>,

    /// Name for the GLB content file [default: content.glb]
    #[arg(long, value_name = "NAME")]
    content_name: Option<String>,

    /// Path to the Java project root directory [default: current directory]
    #[arg(long, value_name = "PATH", env = "SPZ_TILES_PROJECT_ROOT")]
    project_root: Option<PathBuf>,

    /// Time budget of the conversion in seconds
    #[arg(long, value_name = "SECS", default_value_t = spz_tiles::CONVERSION_TIMEOUT.as_secs())]
    timeout: u64,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let project_root = match &self.project_root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        Ok(Settings {
            conversion_timeout: Duration::from_secs(self.timeout),
            ..Settings::with_project_root(project_root)
        })
    }
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    run(Args::parse())
}

/// Exit code 0 only for a successful conversion or a closed window.
fn run(args: Args) -> Result<ExitCode> {
    let settings = args.settings()?;

    if args.gui {
        return run_gui(settings);
    }

    let (Some(input), Some(output_dir)) = (&args.input_file, &args.output_dir) else {
        Args::command()
            .print_help()
            .context("Failed to print help")?;
        return Ok(ExitCode::FAILURE);
    };

    let converter = Converter::new(settings);
    let request = ConversionRequest::new(input, output_dir, args.content_name.as_deref());
    let report = converter.convert_with(&request, &CancelToken::new(), |line| {
        match line.level {
            Level::Failure => eprintln!("{line}"),
            Level::Info | Level::Success => println!("{line}"),
        }
    });

    Ok(if report.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(feature = "gui")]
fn run_gui(settings: Settings) -> Result<ExitCode> {
    gui::run(settings)?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(not(feature = "gui"))]
fn run_gui(_settings: Settings) -> Result<ExitCode> {
    eprintln!("Error: GUI not available. Rebuild spz-to-tiles with the \"gui\" feature.");
    Ok(ExitCode::FAILURE)
}
