mod common;

use common::{spz_file, FakeEnvironment, FakeRunner, Response, MVN};
use spz_tiles::{
    CancelToken, ConversionRequest, Converter, Error, Level, LogLine, PrerequisiteCheck, Settings,
    CONVERSION_TIMEOUT,
};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn converter(env: FakeEnvironment, runner: &FakeRunner) -> Converter<FakeEnvironment, &FakeRunner> {
    Converter::with_parts(env, runner, Settings::with_project_root("/work/jspz"))
}

fn texts(lines: &[LogLine]) -> Vec<&str> {
    lines.iter().map(|l| l.text.as_str()).collect()
}

#[test]
fn successful_conversion() {
    let dir = tempdir().unwrap();
    let input = spz_file(dir.path());
    let output = dir.path().join("tiles");
    let runner = FakeRunner::succeeding();

    let report = converter(FakeEnvironment::installed(), &runner)
        .convert(&ConversionRequest::new(&input, &output, None));

    assert!(report.succeeded());
    let result = report.output().unwrap();
    assert_eq!(result.tileset, output.join("tileset.json"));
    assert_eq!(result.content, output.join("content.glb"));

    let lines = texts(report.lines());
    assert!(lines.contains(&"✓ Conversion completed successfully!"));
    assert!(lines.contains(&format!("    - {}", output.join("tileset.json").display()).as_str()));
    assert!(lines.contains(&format!("    - {}", output.join("content.glb").display()).as_str()));

    // Version query first, then exactly one conversion
    let calls = runner.calls.borrow();
    assert_eq!(calls.len(), 2);
    let (command, timeout) = &calls[1];
    assert_eq!(*timeout, CONVERSION_TIMEOUT);
    assert_eq!(command.program, PathBuf::from(MVN));
    assert_eq!(command.cwd.as_deref(), Some(Path::new("/work/jspz")));
    let args: Vec<String> = command
        .args
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        args,
        [
            "exec:java".to_owned(),
            "-Dexec.mainClass=de.javagl.jspz.examples.SpzToTileset".to_owned(),
            format!(
                "-Dexec.args={} {} content.glb",
                input.display(),
                output.display()
            ),
            "-pl".to_owned(),
            "jspz-main".to_owned(),
            "-q".to_owned(),
        ]
    );
}

#[test]
fn custom_content_name() {
    let dir = tempdir().unwrap();
    let input = spz_file(dir.path());
    let runner = FakeRunner::succeeding();

    let report = converter(FakeEnvironment::installed(), &runner).convert(
        &ConversionRequest::new(&input, dir.path(), Some("bunny.glb")),
    );

    let output = report.into_result().unwrap();
    assert_eq!(output.content, dir.path().join("bunny.glb"));
    let exec_args = runner.calls()[1].args[2].to_string_lossy().into_owned();
    assert!(exec_args.ends_with(" bunny.glb"));
}

#[test]
fn blank_content_name_uses_default() {
    let dir = tempdir().unwrap();
    let input = spz_file(dir.path());
    let runner = FakeRunner::succeeding();

    let report = converter(FakeEnvironment::installed(), &runner)
        .convert(&ConversionRequest::new(&input, dir.path(), Some("   ")));

    assert_eq!(
        report.output().unwrap().content,
        dir.path().join("content.glb")
    );
}

#[test]
fn missing_prerequisite_prevents_conversion() {
    let dir = tempdir().unwrap();
    let input = spz_file(dir.path());

    let mut no_maven = FakeEnvironment::installed();
    no_maven.executables.clear();
    let mut no_home = FakeEnvironment::installed();
    no_home.vars.clear();
    let mut no_java = FakeEnvironment::installed();
    no_java.files.clear();

    let cases = [
        (no_maven, Response::ok(), PrerequisiteCheck::BuildTool),
        (no_home, Response::ok(), PrerequisiteCheck::RuntimeHome),
        (no_java, Response::ok(), PrerequisiteCheck::RuntimeExecutable),
        (
            FakeEnvironment::installed(),
            Response::fail(1, "broken"),
            PrerequisiteCheck::BuildToolSelfTest,
        ),
    ];

    for (env, version, check) in cases {
        let runner = FakeRunner::new(version, Response::ok());
        let output = dir.path().join(format!("{check:?}"));
        let report =
            converter(env, &runner).convert(&ConversionRequest::new(&input, &output, None));

        assert!(!report.succeeded());
        assert_eq!(report.error().unwrap().prerequisite(), Some(check));
        assert_eq!(runner.conversions(), 0);
        assert!(!output.exists());

        let lines = report.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].level, Level::Failure);
        assert!(lines[0].text.starts_with("✗ Prerequisites check failed: "));
    }
}

#[test]
fn missing_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("missing.spz");
    let output = dir.path().join("tiles");
    let runner = FakeRunner::succeeding();

    let report = converter(FakeEnvironment::installed(), &runner)
        .convert(&ConversionRequest::new(&input, &output, None));

    assert!(matches!(report.error(), Some(Error::InvalidInput { .. })));
    assert_eq!(runner.conversions(), 0);
    assert!(!output.exists());
    assert_eq!(
        texts(report.lines()),
        [format!("✗ Input file '{}' does not exist", input.display())]
    );
}

#[test]
fn output_directory_is_created() {
    let dir = tempdir().unwrap();
    let input = spz_file(dir.path());
    let output = dir.path().join("nested").join("tiles");
    let runner = FakeRunner::succeeding();
    let converter = converter(FakeEnvironment::installed(), &runner);
    let request = ConversionRequest::new(&input, &output, None);

    assert!(converter.convert(&request).succeeded());
    assert!(output.is_dir());

    // The existing directory is fine for the second run
    assert!(converter.convert(&request).succeeded());
    assert_eq!(runner.conversions(), 2);
}

#[test]
fn conversion_fails() {
    let dir = tempdir().unwrap();
    let input = spz_file(dir.path());
    let runner = FakeRunner::new(
        Response::ok(),
        Response::Exit {
            code: 1,
            stdout: "[INFO] reading",
            stderr: "java.io.IOException: Invalid SPZ header",
        },
    );

    let report = converter(FakeEnvironment::installed(), &runner)
        .convert(&ConversionRequest::new(&input, dir.path(), None));

    match report.error() {
        Some(Error::ProcessFailed { code, stderr, .. }) => {
            assert_eq!(*code, Some(1));
            assert_eq!(stderr, "java.io.IOException: Invalid SPZ header");
        }
        other => panic!("Unexpected result: {other:?}"),
    }
    let lines = texts(report.lines());
    assert!(lines.contains(&"✗ Conversion failed!"));
    assert!(lines.contains(&"Return code: 1"));
    assert!(lines.contains(&"Standard output: [INFO] reading"));
    assert!(lines.contains(&"Error output: java.io.IOException: Invalid SPZ header"));
}

#[test]
fn conversion_times_out() {
    let dir = tempdir().unwrap();
    let input = spz_file(dir.path());
    let runner = FakeRunner::new(Response::ok(), Response::Timeout);

    let report = converter(FakeEnvironment::installed(), &runner)
        .convert(&ConversionRequest::new(&input, dir.path(), None));

    assert!(matches!(report.error(), Some(Error::Timeout { .. })));
    assert_eq!(
        report.lines().last().unwrap().text,
        "✗ Conversion timed out after 5 minutes"
    );
}

#[test]
fn build_tool_vanished() {
    let dir = tempdir().unwrap();
    let input = spz_file(dir.path());
    let runner = FakeRunner::new(Response::ok(), Response::NotFound);

    let report = converter(FakeEnvironment::installed(), &runner)
        .convert(&ConversionRequest::new(&input, dir.path(), None));

    assert!(matches!(report.error(), Some(Error::Launch { .. })));
    assert!(report
        .lines()
        .last()
        .unwrap()
        .text
        .starts_with("✗ Command not found: "));
}

#[test]
fn sink_sees_every_line_in_order() {
    let dir = tempdir().unwrap();
    let input = spz_file(dir.path());
    let runner = FakeRunner::succeeding();

    let mut streamed = Vec::new();
    let report = converter(FakeEnvironment::installed(), &runner).convert_with(
        &ConversionRequest::new(&input, dir.path(), None),
        &CancelToken::new(),
        |line| streamed.push(line.clone()),
    );

    assert_eq!(streamed, report.lines());
    assert!(streamed[0].text.starts_with("Converting "));
    assert!(streamed[1].text.starts_with("Running: "));
    assert_eq!(streamed[2].level, Level::Success);
}
