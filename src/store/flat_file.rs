//! Flat-file record store
//!
//! One record per line; the first attribute of each line is its key.
//!
//! # Write-back
//!
//! Every write runs under the per-file lock and follows the same steps:
//! 1. read the current file content
//! 2. write that content to `<file>.bak` (abort on failure, nothing mutated)
//! 3. find the first line whose key matches (abort with `NotFound` if none)
//! 4. write the new content to a temporary file in the same directory,
//!    fsync it, rename it over the data file and fsync the directory
//!
//! A crash at any point leaves either the old file or the new file at the
//! data path, never a partial one. All lines other than the replaced one are
//! kept byte-for-byte, including their line terminators.
//!
//! # Encoding
//!
//! The file is handled as bytes. Only the line being read or rewritten has
//! to be valid UTF-8; legacy lines in other encodings are carried through a
//! rewrite untouched. `scan` decodes lossily.
//!
//! # Duplicate keys
//!
//! The first matching line wins for both reads and writes. Later lines with
//! the same key are left alone and a warning is logged.

use crate::core::traits::RecordStore;
use crate::store::lock::FileLockRegistry;
use crate::types::{RecordError, ATTRIBUTE_MARK};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Record store backed by a newline-separated flat file
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    path: PathBuf,
    locks: Arc<FileLockRegistry>,
}

impl FlatFileStore {
    /// Open a store over `path` with its own lock registry
    ///
    /// The file is not touched until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_lock_registry(path, Arc::new(FileLockRegistry::new()))
    }

    /// Open a store that shares `locks` with other stores
    pub fn with_lock_registry(path: impl Into<PathBuf>, locks: Arc<FileLockRegistry>) -> Self {
        Self {
            path: path.into(),
            locks,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the pre-write copy of the file is kept
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    fn read_content(&self) -> Result<Vec<u8>, RecordError> {
        fs::read(&self.path)
            .map_err(|e| RecordError::io(&format!("read {}", self.path.display()), e))
    }

    fn backup(&self, content: &[u8]) -> Result<(), RecordError> {
        let backup_path = self.backup_path();
        write_atomic(&backup_path, content, None)
            .map_err(|e| RecordError::io(&format!("backup to {}", backup_path.display()), e))?;
        debug!(backup = %backup_path.display(), "backup written");
        Ok(())
    }
}

fn check_key(key: &str) -> Result<(), RecordError> {
    if key.is_empty() {
        return Err(RecordError::configuration("record key must not be empty"));
    }
    Ok(())
}

/// The first attribute of a raw line, as bytes
fn line_key(body: &[u8]) -> &[u8] {
    let mark = ATTRIBUTE_MARK as u8;
    body.split(|byte| *byte == mark).next().unwrap_or_default()
}

/// Strip the line terminator from one `split_inclusive` segment
fn split_terminator(segment: &[u8]) -> (&[u8], &[u8]) {
    let body = segment.strip_suffix(b"\n").unwrap_or(segment);
    let body = body.strip_suffix(b"\r").unwrap_or(body);
    segment.split_at(body.len())
}

/// Line segments of the file, each with its terminator (if any)
fn segments(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    content.split_inclusive(|byte| *byte == b'\n')
}

fn decode_line<'a>(key: &str, body: &'a [u8]) -> Result<&'a str, RecordError> {
    std::str::from_utf8(body)
        .map_err(|e| RecordError::io(&format!("decode line for key '{}'", key), e))
}

/// Replace the first line keyed `key`, returning the new content
///
/// `f` receives the current line and returns the replacement.
fn replace_line<F>(content: &[u8], key: &str, f: F) -> Result<(Vec<u8>, String), RecordError>
where
    F: FnOnce(&str) -> Result<String, RecordError>,
{
    let mut out = Vec::with_capacity(content.len());
    let mut committed: Option<String> = None;
    let mut f = Some(f);

    for segment in segments(content) {
        let (body, terminator) = split_terminator(segment);
        if line_key(body) != key.as_bytes() {
            out.extend_from_slice(segment);
            continue;
        }
        match f.take() {
            Some(f) => {
                let line = f(decode_line(key, body)?)?;
                check_line(key, &line)?;
                out.extend_from_slice(line.as_bytes());
                out.extend_from_slice(terminator);
                committed = Some(line);
            }
            None => {
                warn!(key, "duplicate key in data file, only the first line is updated");
                out.extend_from_slice(segment);
            }
        }
    }

    match committed {
        Some(line) => Ok((out, line)),
        None => Err(RecordError::not_found(key)),
    }
}

fn check_line(key: &str, line: &str) -> Result<(), RecordError> {
    if line.contains(['\n', '\r']) {
        return Err(RecordError::configuration(
            "record line must not contain line breaks",
        ));
    }
    let new_key = line_key(line.as_bytes());
    if new_key != key.as_bytes() {
        return Err(RecordError::configuration(format!(
            "rewritten line must keep key '{}', got '{}'",
            key,
            String::from_utf8_lossy(new_key)
        )));
    }
    Ok(())
}

/// Write `bytes` to `path` via a temporary file and rename
///
/// The temporary file lives in the target directory so the rename stays on
/// one filesystem. `permissions` are applied before the rename when given.
/// The directory is fsynced afterwards so the rename itself is durable.
fn write_atomic(
    path: &Path,
    bytes: &[u8],
    permissions: Option<fs::Permissions>,
) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    if let Some(permissions) = permissions {
        temp.as_file().set_permissions(permissions)?;
    }
    temp.persist(path).map_err(|e| e.error)?;
    sync_dir(dir)
}

/// Flush a directory entry table to disk
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

impl RecordStore for FlatFileStore {
    /// Find the first line keyed `key`
    ///
    /// Reads are not serialised with writes; a reader racing a write sees
    /// either the old or the new file because writes commit by rename.
    fn locate(&self, key: &str) -> Result<String, RecordError> {
        check_key(key)?;
        let content = self.read_content()?;

        let mut matches = segments(&content)
            .map(|segment| split_terminator(segment).0)
            .filter(|body| line_key(body) == key.as_bytes());
        let Some(body) = matches.next() else {
            debug!(key, "record not found");
            return Err(RecordError::not_found(key));
        };
        if matches.next().is_some() {
            warn!(key, "duplicate key in data file, using the first line");
        }
        Ok(decode_line(key, body)?.to_string())
    }

    fn write(&self, key: &str, line: &str) -> Result<(), RecordError> {
        self.modify(key, |_| Ok(line.to_string())).map(|_| ())
    }

    fn modify<F>(&self, key: &str, f: F) -> Result<String, RecordError>
    where
        F: FnOnce(&str) -> Result<String, RecordError>,
    {
        check_key(key)?;
        self.locks.with_exclusive(&self.path, || {
            let content = self.read_content()?;
            self.backup(&content)?;

            let (new_content, line) = replace_line(&content, key, f)?;

            let permissions = fs::metadata(&self.path).ok().map(|meta| meta.permissions());
            write_atomic(&self.path, &new_content, permissions)
                .map_err(|e| RecordError::io(&format!("rewrite {}", self.path.display()), e))?;
            info!(key, file = %self.path.display(), "record written back");
            Ok(line)
        })
    }

    fn scan(&self) -> Result<Vec<String>, RecordError> {
        let content = self.read_content()?;
        Ok(segments(&content)
            .map(|segment| String::from_utf8_lossy(split_terminator(segment).0).into_owned())
            .filter(|line| !line.trim().is_empty())
            .collect())
    }
}
