//! Text persistence, one file per field holding a single bincode encoded string.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Suffix appended to the field name to build its file name
pub const TEXT_FILE_SUFFIX: &str = "_text.p";

/// Outcome of restoring a persisted value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The value was read and applied
    Restored,
    /// There is no file for this value, nothing changed
    NotFound,
    /// The file exists but cannot be read or decoded, nothing changed
    Corrupt(String),
}

impl LoadStatus {
    #[inline]
    pub fn is_restored(&self) -> bool {
        matches!(self, LoadStatus::Restored)
    }
}

/// Location of the file for `name`: `<prefix><name>_text.p`.
/// The prefix is concatenated as is, a missing trailing separator is not added.
pub fn text_path(prefix: &str, name: &str) -> PathBuf {
    PathBuf::from(format!("{prefix}{name}{TEXT_FILE_SUFFIX}"))
}

/// Writes `text` overwriting any previous file. Directories are not created.
pub fn save_text(path: &Path, text: &str) -> Result<(), String> {
    let bytes = bincode::serde::encode_to_vec(text, bincode::config::standard())
        .map_err(|e| format!("Text serialization as binary failed: {e}"))?;

    std::fs::write(path, bytes)
        .map_err(|e| format!("Cannot write text file '{}': {e}", path.display()))?;

    log::debug!("Text saved to '{}'", path.display());
    Ok(())
}

/// Reads the text stored at `path`
pub fn load_text(path: &Path) -> Result<String, LoadStatus> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(LoadStatus::NotFound),
        Err(e) => {
            let reason = format!("Cannot read text file '{}': {e}", path.display());
            log::warn!("{reason}");
            return Err(LoadStatus::Corrupt(reason));
        }
    };

    let decoded: Result<(String, usize), _> =
        bincode::serde::decode_from_slice(&bytes, bincode::config::standard());

    let reason = match decoded {
        Ok((text, read)) if read == bytes.len() => {
            log::debug!("Text restored from '{}'", path.display());
            return Ok(text);
        }
        Ok((_, read)) => format!(
            "Text file '{}' has {} unexpected trailing bytes",
            path.display(),
            bytes.len() - read
        ),
        Err(e) => format!("Text file '{}' cannot be decoded: {e}", path.display()),
    };

    log::warn!("{reason}");
    Err(LoadStatus::Corrupt(reason))
}
