use std::path::PathBuf;

use crate::host::sim::SimVideoSpec;

use super::parsers::parse_video_entry;

pub(crate) const DEFAULT_LISTEN: &str = "127.0.0.1:7878";

/// Played by `serve` and `demo` when no `--video` is given.
const DEFAULT_PLAYLIST: [&str; 2] = ["dQw4w9WgXcQ:212", "jNQXAC9IVRw:19"];

pub(crate) fn default_db_path() -> String {
    default_base_dir()
        .join("loops.sqlite3")
        .to_string_lossy()
        .into_owned()
}

pub(crate) fn default_log_path() -> String {
    default_base_dir()
        .join("control.log")
        .to_string_lossy()
        .into_owned()
}

pub(crate) fn default_playlist() -> Vec<SimVideoSpec> {
    DEFAULT_PLAYLIST
        .iter()
        .filter_map(|entry| parse_video_entry(entry).ok())
        .collect()
}

fn default_base_dir() -> PathBuf {
    if let Some(home) = user_home_dir() {
        return home.join(".ytloop");
    }

    PathBuf::from(".ytloop")
}

fn user_home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        if let Some(value) = std::env::var_os("USERPROFILE") {
            return Some(PathBuf::from(value));
        }
    }

    std::env::var_os("HOME").map(PathBuf::from)
}
