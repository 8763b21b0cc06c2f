//! Reading and replacing gzip-compressed Live set (`.als`) files.
//!
//! `save` always moves the previous file to a backup before anything is
//! written, so a failure part-way through leaves the old set recoverable
//! under `<name>_old.als`.

use flate2::read::GzDecoder;
use flate2::{Compression, GzBuilder};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{Error, Result};

/// File extension of Live sets.
pub const EXTENSION: &str = "als";

/// Marker inserted before the extension of the backup file.
pub const BACKUP_SUFFIX: &str = "_old";

/// First two bytes of every gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Paths produced by a successful [`save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedProject {
    /// Where the previous version of the set was moved.
    pub backup: PathBuf,
    /// The rewritten set.
    pub output: PathBuf,
}

/// Append `.als` unless the path already has that extension.
pub fn project_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.extension() == Some(OsStr::new(EXTENSION)) {
        path.to_path_buf()
    } else {
        with_suffix(path, "")
    }
}

/// `song.als` -> `song`: the scratch path for the uncompressed document.
pub fn intermediate_path(path: impl AsRef<Path>) -> PathBuf {
    project_path(path).with_extension("")
}

/// `song.als` -> `song_old.als`.
pub fn backup_path(path: impl AsRef<Path>) -> PathBuf {
    with_suffix(&intermediate_path(path), BACKUP_SUFFIX)
}

/// `path` + `suffix` + `.als`, without touching the bytes of `path`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(suffix);
    raw.push(".");
    raw.push(EXTENSION);
    PathBuf::from(raw)
}

/// Read and parse a compressed Live set.
pub fn load(path: impl AsRef<Path>) -> Result<Document> {
    let path = project_path(path);
    if !path.is_file() {
        return Err(Error::NotFound { path });
    }

    let mut file = File::open(&path).map_err(|e| Error::io(&path, e))?;
    let mut compressed = Vec::new();
    file.read_to_end(&mut compressed)
        .map_err(|e| Error::io(&path, e))?;

    if !compressed.starts_with(&GZIP_MAGIC) {
        let magic = compressed.iter().take(GZIP_MAGIC.len()).copied().collect();
        return Err(Error::Format { path, magic });
    }

    let mut xml = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut xml)
        .map_err(|e| Error::io(&path, e))?;
    log::debug!(
        "Decompressed {} ({} -> {} bytes)",
        path.display(),
        compressed.len(),
        xml.len()
    );

    Document::parse(&xml)
}

/// Replace the Live set at `path` with `document`.
///
/// Steps, in order: move the current file to [`backup_path`], write the
/// uncompressed XML to [`intermediate_path`], gzip it into the project path,
/// remove the intermediate file.
pub fn save(path: impl AsRef<Path>, document: &Document) -> Result<SavedProject> {
    let output = project_path(&path);
    let backup = backup_path(&path);
    let scratch = intermediate_path(&path);

    if backup.exists() {
        return Err(Error::io(
            &backup,
            io::Error::new(io::ErrorKind::AlreadyExists, "backup file already exists"),
        ));
    }
    fs::rename(&output, &backup).map_err(|e| Error::io(&output, e))?;
    log::info!("Moved {} to {}", output.display(), backup.display());

    let xml = document.to_xml_bytes()?;
    fs::write(&scratch, &xml).map_err(|e| Error::io(&scratch, e))?;

    compress(&scratch, &output)?;
    fs::remove_file(&scratch).map_err(|e| Error::io(&scratch, e))?;
    log::info!("Wrote {}", output.display());

    Ok(SavedProject { backup, output })
}

/// Gzip the contents of `source` into a new file at `dest`.
fn compress(source: &Path, dest: &Path) -> Result<()> {
    let mut input = File::open(source).map_err(|e| Error::io(source, e))?;
    let out = File::create(dest).map_err(|e| Error::io(dest, e))?;

    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut encoder = GzBuilder::new()
        .filename(name)
        .write(out, Compression::default());

    io::copy(&mut input, &mut encoder).map_err(|e| Error::io(dest, e))?;
    encoder.finish().map_err(|e| Error::io(dest, e))?;
    Ok(())
}
