use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{errors::Error, Result};

/// Default yt-dlp output template: media title + container extension.
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Process-wide configuration, established once at startup and never mutated.
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    pub ytdlp_path: PathBuf,
    pub download_dir: PathBuf,
    pub output_template: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TG_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TG_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let ytdlp_path = env_path("YTDLP_PATH")
            .or_else(|| which_in_path("yt-dlp"))
            .unwrap_or_else(|| PathBuf::from("/usr/local/bin/yt-dlp"));

        let download_dir =
            env_path("DOWNLOAD_DIR").unwrap_or_else(|| PathBuf::from("/tmp/vget"));
        fs::create_dir_all(&download_dir)?;

        let output_template = env_str("OUTPUT_TEMPLATE")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_OUTPUT_TEMPLATE.to_string());

        Ok(Self {
            telegram_bot_token,
            ytdlp_path,
            download_dir,
            output_template,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn which_in_path(binary: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    for dir in env::split_paths(&path) {
        let candidate = dir.join(binary);
        if is_executable_file(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn is_executable_file(p: &Path) -> bool {
    if !p.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(md) = fs::metadata(p) {
            return (md.permissions().mode() & 0o111) != 0;
        }
    }
    true
}
