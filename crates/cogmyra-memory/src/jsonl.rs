//! Line-delimited JSON encoding of memory entries.
//!
//! Every record sits on its own line and is decoded independently, so a
//! corrupt or truncated line only loses that record.

use crate::error::MemoryError;
use crate::model::MemoryEntry;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Result of decoding a JSONL stream.
#[derive(Debug, Default)]
pub(crate) struct Decoded {
    pub(crate) entries: Vec<MemoryEntry>,
    pub(crate) skipped: usize,
}

/// Outcome of [`compact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactReport {
    /// Non-blank lines found in the input.
    pub read: usize,
    /// Valid records written to the output.
    pub kept: usize,
}

/// Decode every parseable record, skipping blank and malformed lines.
pub(crate) fn decode<R: BufRead>(reader: R, source: &str) -> Result<Decoded, MemoryError> {
    let mut decoded = Decoded::default();
    for (idx, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<MemoryEntry>(&line) {
            Ok(entry) => decoded.entries.push(entry),
            Err(err) => {
                decoded.skipped += 1;
                warn!(
                    "skipping invalid memory record (source={source}, line={}): {err}",
                    idx + 1
                );
            }
        }
    }
    Ok(decoded)
}

/// Load all records from a backing file. A missing file holds no records.
pub(crate) fn read_file(path: &Path) -> Result<Decoded, MemoryError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("memory file missing (path={})", path.display());
            return Ok(Decoded::default());
        }
        Err(err) => return Err(MemoryError::Io(err)),
    };
    let source = path.display().to_string();
    decode(BufReader::new(file), &source)
}

/// Write records as JSONL to an arbitrary sink, returning the count.
pub(crate) fn encode(out: &mut dyn Write, entries: &[MemoryEntry]) -> Result<usize, MemoryError> {
    for entry in entries {
        let line = serde_json::to_string(entry)?;
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(entries.len())
}

/// Replace the file contents with `entries` via a temp file and rename.
pub(crate) fn write_file(path: &Path, entries: &[MemoryEntry]) -> Result<(), MemoryError> {
    ensure_parent(path)?;
    let temp_path = temp_path(path);
    let written = write_synced(&temp_path, entries)
        .and_then(|()| std::fs::rename(&temp_path, path).map_err(MemoryError::from));
    if written.is_err()
        && let Err(err) = std::fs::remove_file(&temp_path)
        && err.kind() != std::io::ErrorKind::NotFound
    {
        warn!(
            "failed to remove temp memory file (path={}): {err}",
            temp_path.display()
        );
    }
    written
}

fn write_synced(path: &Path, entries: &[MemoryEntry]) -> Result<(), MemoryError> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer, entries)?;
    writer
        .into_inner()
        .map_err(|err| MemoryError::Io(err.into_error()))?
        .sync_all()?;
    Ok(())
}

/// Append records to the end of the file in a single write.
///
/// A file whose last line is unterminated (a torn write) gets a newline first,
/// so the fragment stays on its own line and the new records remain readable.
pub(crate) fn append_file(path: &Path, entries: &[MemoryEntry]) -> Result<(), MemoryError> {
    if entries.is_empty() {
        return Ok(());
    }
    ensure_parent(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)?;
    let mut buf = Vec::new();
    if ends_with_partial_line(&mut file)? {
        warn!(
            "memory file ends with a partial record, terminating it (path={})",
            path.display()
        );
        buf.push(b'\n');
    }
    encode(&mut buf, entries)?;
    file.write_all(&buf)?;
    Ok(())
}

fn ends_with_partial_line(file: &mut File) -> Result<bool, MemoryError> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Rewrite a JSONL file keeping only records that decode.
pub fn compact(input: &Path, output: &Path) -> Result<CompactReport, MemoryError> {
    let decoded = read_file(input)?;
    let report = CompactReport {
        read: decoded.entries.len() + decoded.skipped,
        kept: decoded.entries.len(),
    };
    write_file(output, &decoded.entries)?;
    info!(
        "compacted memory file (input={}, output={}, read={}, kept={})",
        input.display(),
        output.display(),
        report.read,
        report.kept
    );
    Ok(report)
}

fn ensure_parent(path: &Path) -> Result<(), MemoryError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
