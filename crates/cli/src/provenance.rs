//! `<report>.provenance.json`: what produced a build report and from which inputs.

use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use serde::Serialize;
use thumbcluster::params::ClusterParameters;
use thumbcluster::validate::ValidationReport;

/// Inputs of one `build` run.
pub struct BuildRecord<'a> {
    pub variant: &'static str,
    pub params_file: Option<&'a Path>,
    pub params: &'a ClusterParameters,
    pub validation: &'a ValidationReport,
    pub tags: &'a [String],
}

#[derive(Debug, Serialize)]
struct ParamsSource {
    path: String,
    bytes: u64,
}

#[derive(Debug, Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Debug, Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    thumbcluster: &'static str,
    callsite: Callsite,
    variant: &'static str,
    /// `None` when the build ran on default parameters.
    params_source: Option<ParamsSource>,
    params: &'a ClusterParameters,
    validation: &'a ValidationReport,
    tags: &'a [String],
    /// The report first, then this sidecar.
    outputs: [String; 2],
}

/// Write the sidecar next to `report` and return its path.
#[track_caller]
pub fn write_sidecar(report: &Path, record: BuildRecord<'_>) -> Result<PathBuf> {
    let callsite = Location::caller();
    let path = sidecar_path(report);
    let params_source = match record.params_file {
        Some(p) => Some(ParamsSource {
            path: p.display().to_string(),
            bytes: fs::metadata(p)
                .with_context(|| format!("reading metadata of {}", p.display()))?
                .len(),
        }),
        None => None,
    };
    let doc = Sidecar {
        code_rev: code_rev(),
        thumbcluster: thumbcluster::VERSION,
        callsite: Callsite {
            file: callsite.file(),
            line: callsite.line(),
        },
        variant: record.variant,
        params_source,
        params: record.params,
        validation: record.validation,
        tags: record.tags,
        outputs: [report.display().to_string(), path.display().to_string()],
    };
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(report: &Path) -> PathBuf {
    let stem = report
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("cluster");
    report.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else "unknown".
fn code_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;
    use thumbcluster::layout::ClusterVariant;

    fn validation() -> ValidationReport {
        crate::report::check(&ClusterParameters::default(), ClusterVariant::Mini).unwrap()
    }

    #[test]
    fn sidecar_sits_next_to_the_report() {
        let derived = sidecar_path(Path::new("/tmp/output/mini.json"));
        assert_eq!(derived, Path::new("/tmp/output/mini.provenance.json"));
    }

    #[test]
    fn sidecar_records_inputs_and_outputs() {
        let dir = tempdir().unwrap();
        let params_file = dir.path().join("params.json");
        fs::write(&params_file, "{}").unwrap();
        let report = dir.path().join("mini.json");
        let params = ClusterParameters::default();
        let validation = validation();
        let tags = vec!["smoke".to_string()];

        let path = write_sidecar(
            &report,
            BuildRecord {
                variant: "MINI",
                params_file: Some(&params_file),
                params: &params,
                validation: &validation,
                tags: &tags,
            },
        )
        .unwrap();

        let doc: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(doc["variant"], "MINI");
        assert_eq!(doc["params_source"]["bytes"], 2);
        assert_eq!(doc["validation"]["hull_windows"], validation.hull_windows);
        assert_eq!(doc["params"]["screw_offset"][0], -29.0);
        assert_eq!(doc["tags"][0], "smoke");
        assert_eq!(doc["outputs"][0], report.display().to_string());
        assert_eq!(doc["outputs"][1], path.display().to_string());
    }

    #[test]
    fn defaults_have_no_params_source() {
        let dir = tempdir().unwrap();
        let report = dir.path().join("defaults.json");
        let (params, validation) = (ClusterParameters::default(), validation());
        let path = write_sidecar(
            &report,
            BuildRecord {
                variant: "MINI",
                params_file: None,
                params: &params,
                validation: &validation,
                tags: &[],
            },
        )
        .unwrap();
        let doc: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert!(doc["params_source"].is_null());
    }
}
