//! Trace output configuration (strict JSON parsing).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ProfilerError, Result};

// ─── Schema ──────────────────────────────────────────────────────

/// Where and how a [`TraceSession`](crate::trace::TraceSession) writes
/// its output file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceConfig {
    /// Directory the trace file is written into (created if absent)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name prefix; the local timestamp and `.json` are appended
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Key of the single `otherData` entry
    #[serde(default = "default_tool_name")]
    pub tool_name: String,

    /// Value of the single `otherData` entry
    #[serde(default = "default_tool_info")]
    pub tool_info: String,

    /// `displayTimeUnit` in the envelope — the trace viewer accepts "ns" or "ms"
    #[serde(default = "default_display_time_unit")]
    pub display_time_unit: String,

    /// Name given to the session's own opening scope
    #[serde(default = "default_session_name")]
    pub session_name: String,

    /// Emit the `{}` placeholder ahead of the first real event
    #[serde(default = "default_leading_empty_event")]
    pub leading_empty_event: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("ProfilerData")
}
fn default_file_prefix() -> String {
    "ProfilerData".into()
}
fn default_tool_name() -> String {
    "scope_profiler".into()
}
fn default_tool_info() -> String {
    format!("scope-profiler v{}", env!("CARGO_PKG_VERSION"))
}
fn default_display_time_unit() -> String {
    "ns".into()
}
fn default_session_name() -> String {
    "session".into()
}
fn default_leading_empty_event() -> bool {
    true
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            tool_name: default_tool_name(),
            tool_info: default_tool_info(),
            display_time_unit: default_display_time_unit(),
            session_name: default_session_name(),
            leading_empty_event: default_leading_empty_event(),
        }
    }
}

impl TraceConfig {
    /// Default config writing into `dir` instead of `./ProfilerData`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_prefix.is_empty() {
            return Err(ProfilerError::Config("file_prefix must not be empty".into()));
        }
        if self.file_prefix.contains(['/', '\\']) {
            return Err(ProfilerError::Config(
                "file_prefix must not contain path separators".into(),
            ));
        }
        if self.tool_name.is_empty() {
            return Err(ProfilerError::Config("tool_name must not be empty".into()));
        }
        if !matches!(self.display_time_unit.as_str(), "ns" | "ms") {
            return Err(ProfilerError::Config(format!(
                "display_time_unit must be \"ns\" or \"ms\", got {:?}",
                self.display_time_unit
            )));
        }
        Ok(())
    }
}

// ─── Loaders ─────────────────────────────────────────────────────

pub fn load_from_file(path: impl AsRef<Path>) -> Result<TraceConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| ProfilerError::io(path, e))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<TraceConfig> {
    let cfg: TraceConfig = serde_json::from_str(s)
        .map_err(|e| ProfilerError::Config(format!("invalid json: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
