//! Provenance sidecars: every artifact `x.ext` gets `x.provenance.json` with
//! the code revision, the callsite, the run parameters and the batch report.

use anyhow::{Context, Result};
use cliparea::batch::{BatchReport, Stride};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Serializable mirror of `BatchReport`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOut {
    pub pairs: usize,
    pub collapsed: usize,
    pub skipped_clipper_edges: u64,
    pub skipped_subject_edges: u64,
    pub parallel_fallbacks: u64,
    pub invalid_clippers: usize,
}

impl From<BatchReport> for ReportOut {
    fn from(r: BatchReport) -> Self {
        Self {
            pairs: r.pairs,
            collapsed: r.collapsed,
            skipped_clipper_edges: r.skipped_clipper_edges,
            skipped_subject_edges: r.skipped_subject_edges,
            parallel_fallbacks: r.parallel_fallbacks,
            invalid_clippers: r.invalid_clippers,
        }
    }
}

/// The command that produced an artifact, with its inputs.
#[derive(Serialize, Debug)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Run<'a> {
    Areas {
        input: &'a str,
        vertices: usize,
        stride: &'static str,
        parallel: bool,
        validate_clippers: bool,
        report: ReportOut,
    },
    Sample {
        count: usize,
        seed: u64,
        vertices: usize,
    },
    Report,
}

pub fn stride_label(stride: Stride) -> &'static str {
    match stride {
        Stride::Triangle => "triangle",
        Stride::VertexCount => "vertex-count",
    }
}

#[derive(Serialize, Debug, Clone, Copy)]
pub struct Callsite {
    pub file: &'static str,
    pub line: u32,
}

/// Body of a provenance sidecar (also printed by `cliparea report`).
#[derive(Serialize, Debug)]
pub struct Sidecar<'a> {
    pub code_rev: String,
    pub lib_version: &'static str,
    pub callsite: Callsite,
    pub tag: Option<&'a str>,
    pub run: Run<'a>,
    pub outputs: Vec<String>,
}

impl<'a> Sidecar<'a> {
    #[track_caller]
    pub fn new(run: Run<'a>, tag: Option<&'a str>) -> Self {
        let caller = Location::caller();
        Self {
            code_rev: current_git_rev(),
            lib_version: cliparea::VERSION,
            callsite: Callsite {
                file: caller.file(),
                line: caller.line(),
            },
            tag,
            run,
            outputs: Vec::new(),
        }
    }
}

/// Write `<artifact stem>.provenance.json` next to `artifact`.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, run: Run<'_>, tag: Option<&str>) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let mut sidecar = Sidecar::new(run, tag);
    sidecar.outputs.push(artifact.to_string_lossy().into_owned());

    let path = provenance_path(artifact);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    fs::write(&path, serde_json::to_vec_pretty(&sidecar)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "provenance");
    Ok(path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else "unknown".
pub fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return rev.to_string();
    }
    if let Ok(rev) = std::env::var("GIT_COMMIT") {
        if !rev.is_empty() {
            return rev;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
