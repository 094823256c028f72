//! On-disk bundle persistence.
//!
//! Bundles serialize to JSON. Payloads above a size threshold are written
//! gzip-compressed with a `.gz` suffix; loading tries the plain path first
//! and falls back to the compressed one, so a course directory may hold
//! either form.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use edurag_core::error::{EduragError, Result};
use edurag_core::models::CourseBundle;

/// JSON payloads larger than this are written gzip-compressed.
pub const COMPRESS_THRESHOLD_BYTES: usize = 10 * 1024 * 1024;

/// Serialize `value` to `path` as JSON, switching to `path.gz` when the
/// payload exceeds [`COMPRESS_THRESHOLD_BYTES`]. Returns the path written.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf> {
    let payload = serde_json::to_vec_pretty(value)
        .map_err(|e| EduragError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    if payload.len() > COMPRESS_THRESHOLD_BYTES {
        let gz_path = gz_path_for(path);
        let file = File::create(&gz_path)?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(&payload)?;
        encoder.finish()?;
        // Drop a stale uncompressed copy so loads don't pick it up.
        if path.exists() {
            fs::remove_file(path)?;
        }
        tracing::debug!(path = %gz_path.display(), bytes = payload.len(), "wrote compressed json");
        Ok(gz_path)
    } else {
        fs::write(path, &payload)?;
        let gz_path = gz_path_for(path);
        if gz_path.exists() {
            fs::remove_file(&gz_path)?;
        }
        Ok(path.to_path_buf())
    }
}

/// Load JSON from `path`, falling back to `path.gz` when the plain file is
/// absent. Returns `None` when neither exists.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let payload = if path.exists() {
        fs::read(path)?
    } else {
        let gz_path = gz_path_for(path);
        if !gz_path.exists() {
            return Ok(None);
        }
        let file = File::open(&gz_path)?;
        let mut decoder = GzDecoder::new(file);
        let mut buf = Vec::new();
        decoder.read_to_end(&mut buf)?;
        buf
    };

    let value = serde_json::from_slice(&payload)
        .map_err(|e| EduragError::Serialization(e.to_string()))?;
    Ok(Some(value))
}

/// Persist a course bundle under `dir/course_bundle.json`.
pub fn save_bundle(dir: &Path, bundle: &CourseBundle) -> Result<PathBuf> {
    save_json(&dir.join("course_bundle.json"), bundle)
}

/// Load a course bundle from `dir`, if one was saved.
pub fn load_bundle(dir: &Path) -> Result<Option<CourseBundle>> {
    load_json(&dir.join("course_bundle.json"))
}

fn gz_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".gz");
    PathBuf::from(os)
}
