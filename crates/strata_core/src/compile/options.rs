use std::path::PathBuf;

use serde::Deserialize;

/// Options for [`super::compile`], loadable with any serde format.
///
/// ```ignore
/// let options: CompileOptions = serde_json::from_str(r#"{ "bind_intermediates": true }"#)?;
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Bind each operator's output to a local `op_<n>`, rather than nesting
    /// it in its consumer.
    pub bind_intermediates: bool,

    /// Write the rendered program here after compiling.
    pub debug_file: Option<PathBuf>,

    /// The name of the rendered pipeline function.
    pub pipeline_name: Option<String>,
}
