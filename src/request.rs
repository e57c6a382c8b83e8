use std::path::PathBuf;

/// Content file name used when none is given.
pub const DEFAULT_CONTENT_NAME: &str = "content.glb";

/// Name of the tileset descriptor written by the converter.
pub const TILESET_FILE_NAME: &str = "tileset.json";

/// Returns the content file name to use for an optional user value.
///
/// Missing, empty and whitespace-only values fall back to [`DEFAULT_CONTENT_NAME`],
/// everything else is trimmed.
/// Command line and form input both go through this function.
pub fn resolve_content_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => DEFAULT_CONTENT_NAME.to_owned(),
    }
}

/// The three inputs of a conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionRequest {
    /// SPZ file to convert.
    pub input: PathBuf,

    /// Directory receiving the tileset, created if missing.
    pub output_dir: PathBuf,

    /// File name of the binary glTF content inside the output directory.
    pub content_name: String,
}

impl ConversionRequest {
    pub fn new(
        input: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        content_name: Option<&str>,
    ) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            content_name: resolve_content_name(content_name),
        }
    }
}
