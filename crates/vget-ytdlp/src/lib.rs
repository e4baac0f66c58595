//! yt-dlp adapter.
//!
//! Implements the `vget-core` fetcher port by invoking the yt-dlp CLI twice
//! per request: once to download in quiet mode, once with `--print filename`
//! to learn the name the output template resolved to.

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use url::Url;

use vget_core::{config::Config, errors::Error, ports::MediaFetcher, Result};

const STDERR_TAIL_MAX_BYTES: usize = 16 * 1024;
const STDERR_TAIL_MAX_LINES: usize = 200;

#[derive(Clone, Debug)]
pub struct YtDlpFetcher {
    program: PathBuf,
    output_template: String,
}

impl YtDlpFetcher {
    pub fn new(cfg: &Config) -> Self {
        Self {
            program: cfg.ytdlp_path.clone(),
            output_template: cfg.output_template.clone(),
        }
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(&self, url: &Url, workdir: &Path) -> Result<()> {
        debug!(program = %self.program.display(), %url, workdir = %workdir.display(), "fetching");

        let output = Command::new(&self.program)
            .args(["-o", self.output_template.as_str(), "--quiet"])
            .arg(url.as_str())
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                Error::Fetch(format!("failed to launch {}: {e}", self.program.display()))
            })?;

        if !output.status.success() {
            let tail = stderr_tail(&output.stderr);
            return Err(Error::Fetch(format!(
                "yt-dlp exited with {}: {tail}",
                output.status
            )));
        }

        Ok(())
    }

    async fn resolve_filename(&self, url: &Url, workdir: &Path) -> Result<String> {
        let output = Command::new(&self.program)
            .args(["-o", self.output_template.as_str(), "--print", "filename"])
            .arg(url.as_str())
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                Error::Resolve(format!("failed to launch {}: {e}", self.program.display()))
            })?;

        // Exit status is deliberately not checked: whatever the tool managed
        // to print is parsed, and an empty result is the pipeline's call.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(resolved_filename(&stdout, &stderr))
    }
}

/// The resolved filename is the last non-empty line the tool printed,
/// guarding against warning/preamble lines. The filename goes to stdout and
/// diagnostics to stderr, so stdout wins when both have content.
fn resolved_filename(stdout: &str, stderr: &str) -> String {
    last_non_empty_line(stdout)
        .or_else(|| last_non_empty_line(stderr))
        .unwrap_or_default()
        .to_string()
}

fn last_non_empty_line(text: &str) -> Option<&str> {
    text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .rev()
        .find(|l| !l.is_empty())
}

/// Keep only the tail of a captured stderr buffer for error reporting.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let mut lines: VecDeque<&str> = VecDeque::new();
    let mut bytes = 0usize;

    for line in text.lines() {
        // +1 for the '\n' we join with later.
        bytes = bytes.saturating_add(line.len() + 1);
        lines.push_back(line);

        while lines.len() > STDERR_TAIL_MAX_LINES || bytes > STDERR_TAIL_MAX_BYTES {
            if let Some(front) = lines.pop_front() {
                bytes = bytes.saturating_sub(front.len() + 1);
            } else {
                break;
            }
        }
    }

    lines.into_iter().collect::<Vec<_>>().join("\n")
}
