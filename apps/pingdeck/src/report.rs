use anyhow::{anyhow, Result};
use chrono::{SecondsFormat, Utc};
use pingdeck_model::{HostRecord, HostSummary};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Exit-time summary of a dashboard session.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub version: String,
    pub started_at_utc: String,
    pub finished_at_utc: String,
    pub rounds: u64,
    pub hosts: Vec<HostSummary>,
}

impl SessionReport {
    pub fn new(started_at_utc: String, rounds: u64, records: &[HostRecord]) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at_utc,
            finished_at_utc: now_utc(),
            rounds,
            hosts: records.iter().map(HostRecord::summary).collect(),
        }
    }
}

pub fn now_utc() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn write_report(path: &Path, report: &SessionReport) -> Result<()> {
    let json = serde_json::to_vec_pretty(report)?;
    atomic_write(path, &json)
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .map_err(|err| anyhow!("failed to create report directory {:?}: {}", parent, err))?;
    }

    let tmp_path = temp_path(path);
    let mut file = fs::File::create(&tmp_path)
        .map_err(|err| anyhow!("failed to create temp file {:?}: {}", tmp_path, err))?;
    file.write_all(data)
        .map_err(|err| anyhow!("failed to write temp file {:?}: {}", tmp_path, err))?;
    file.sync_all()
        .map_err(|err| anyhow!("failed to sync temp file {:?}: {}", tmp_path, err))?;

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(anyhow!("failed to replace report {:?}: {}", path, err));
    }

    if let Ok(dir) = fs::File::open(parent) {
        let _ = dir.sync_all();
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("report");
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let pid = std::process::id();
    let tmp_name = format!(".{}.part-{}-{}", file_name, pid, stamp);
    parent.join(tmp_name)
}
