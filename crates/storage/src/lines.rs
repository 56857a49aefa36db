//! Raw line I/O
//!
//! Every call opens, uses and drops its own file handle. Nothing is cached,
//! and nothing is locked: two processes writing the same table will race.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use medtrack_core::Result;
use tracing::{debug, warn};

/// Read every line of `path` in file order, as bytes without terminators.
///
/// A missing file is not an error: a notice is logged and an empty vector
/// is returned. Lines are not decoded, so a line that is not valid UTF-8
/// does not fail the load.
pub fn load_raw_lines(path: &Path) -> Result<Vec<Vec<u8>>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("File {} not found", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut lines = Vec::new();
    for line in BufReader::new(file).split(b'\n') {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        lines.push(line);
    }
    debug!("Loaded {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Read every line of `path` in file order, without line terminators.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD and logged.
pub fn load_lines(path: &Path) -> Result<Vec<String>> {
    let lines = load_raw_lines(path)?
        .into_iter()
        .enumerate()
        .map(|(idx, bytes)| match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => {
                warn!("{}: line {} is not valid UTF-8", path.display(), idx + 1);
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        })
        .collect();
    Ok(lines)
}

/// Overwrite `path` with `lines`, one per line, creating it if absent.
///
/// Lines are written as given; no re-encoding takes place.
pub fn save_lines<S: AsRef<[u8]>>(path: &Path, lines: &[S]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writer.write_all(line.as_ref())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    debug!("Saved {} lines to {}", lines.len(), path.display());
    Ok(())
}

/// Append one line to `path`, creating it if absent.
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    debug!("Appended 1 line to {}", path.display());
    Ok(())
}
