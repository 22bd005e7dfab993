// Boundary to an external PBO extractor. Always returns an outcome value.
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

pub const EXTRACTOR_ENV: &str = "DZT_PBO_EXTRACTOR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOutcome {
    pub ok: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractOutcome {
    fn failed(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(msg.into()),
            ..Default::default()
        }
    }
}

/// Explicit path first, then `DZT_PBO_EXTRACTOR`.
pub fn resolve_extractor(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| {
            std::env::var_os(EXTRACTOR_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
}

/// Runs `<extractor> <archive> <out_dir>` and captures its output.
pub fn extract_pbo(archive: &Path, out_dir: &Path, extractor: Option<&Path>) -> ExtractOutcome {
    let Some(exe) = resolve_extractor(extractor) else {
        return ExtractOutcome::failed(format!(
            "No PBO extractor configured. Set {EXTRACTOR_ENV} to a CLI extractor path."
        ));
    };
    if !exe.exists() {
        return ExtractOutcome::failed(format!("PBO extractor not found at {}", exe.display()));
    }
    tracing::info!(extractor = %exe.display(), archive = %archive.display(), "running extractor");
    match Command::new(&exe).arg(archive).arg(out_dir).output() {
        Ok(out) => {
            let ok = out.status.success();
            let exit_code = out.status.code();
            ExtractOutcome {
                ok,
                exit_code,
                stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
                error: (!ok).then(|| match exit_code {
                    Some(c) => format!("extractor exited with code {c}"),
                    None => "extractor terminated by signal".to_string(),
                }),
            }
        }
        Err(e) => ExtractOutcome::failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_extractor_binary_is_failure() {
        let out = extract_pbo(
            Path::new("a.pbo"),
            Path::new("out"),
            Some(Path::new("/definitely/not/here/extractpbo")),
        );
        assert!(!out.ok);
        assert!(out.error.unwrap().contains("not found"));
        assert_eq!(out.exit_code, None);
    }
}
