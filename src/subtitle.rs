use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Result, ServiceError};

/// Extension of the subtitle artifacts the tool writes
pub const SUBTITLE_EXTENSION: &str = ".srt";

/// Locate the subtitle file the tool wrote into `output_dir`.
///
/// Only the top level of the directory is listed. If several `.srt` files
/// exist, the first one in listing order wins; that order is whatever the
/// filesystem returns and is not stable across platforms.
pub fn find_subtitle_file<P: AsRef<Path>>(output_dir: P) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();

    for entry in WalkDir::new(output_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            ServiceError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::other(format!("Failed to list {}", output_dir.display()))
            }))
        })?;

        let name = entry.file_name().to_string_lossy();
        debug!("Output entry: {}", name);
        if name.ends_with(SUBTITLE_EXTENSION) {
            return Ok(entry.into_path());
        }
    }

    Err(ServiceError::MissingOutput(output_dir.to_path_buf()))
}

/// Read a subtitle file as UTF-8 text
pub fn read_subtitle<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    info!("Reading subtitles: {}", path.display());

    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8(bytes)?)
}
