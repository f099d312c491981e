//! No-clobber JSON artifacts.
//!
//! A record is written only when nothing exists at its target path. The file
//! is opened with create-new semantics, so an existing artifact is never
//! truncated, merged or rewritten.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::GenerateError;

/// What happened to one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file did not exist and was written
    Created,
    /// A file already existed at the target path and was left alone
    Skipped,
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Skipped => f.write_str("skipped"),
        }
    }
}

/// Serialize with 4-space indentation and a trailing newline
pub fn to_json_bytes<T: Serialize>(record: &T) -> Result<Vec<u8>, GenerateError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    record.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write `record` to `path` unless something is already there
///
/// The record is serialized before the file is touched, so a serialization
/// failure never leaves an empty artifact behind.
pub fn write_if_absent<T: Serialize>(
    path: &Path,
    record: &T,
) -> Result<WriteOutcome, GenerateError> {
    let bytes = to_json_bytes(record)?;

    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            info!("File already exists, skipping: {}", path.display());
            return Ok(WriteOutcome::Skipped);
        }
        Err(e) => return Err(GenerateError::io(path, e)),
    };
    write_or_remove(file, path, &bytes)?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(WriteOutcome::Created)
}

/// Write `bytes` to the freshly created `path`, removing it again if the
/// write fails so the next run does not skip a truncated artifact
fn write_or_remove<W: Write>(mut out: W, path: &Path, bytes: &[u8]) -> Result<(), GenerateError> {
    if let Err(e) = out.write_all(bytes).and_then(|_| out.flush()) {
        drop(out);
        if let Err(remove_err) = fs::remove_file(path) {
            warn!(
                "Failed to remove partial file {}: {}",
                path.display(),
                remove_err
            );
        }
        return Err(GenerateError::io(path, e));
    }
    Ok(())
}
