//! Sequential line locator
//!
//! Walks a buffered reader from the start, counting `\n` terminators, and
//! returns the requested line. Lines before the target are skipped straight
//! out of the read buffer, so memory stays at one buffer plus the target
//! line no matter how large the dataset is.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::{Error, Result};

/// Something that can produce line `line_number` of dataset `file_id`
///
/// This is the seam the cache layer talks to; [`crate::Dataset`] is the
/// file-backed implementation.
#[async_trait]
pub trait LineLocator: Send + Sync {
    /// Return the text of the 1-indexed line, without its terminator
    async fn locate(&self, file_id: &str, line_number: u64) -> Result<String>;
}

/// Scan `reader` for the 1-indexed `line_number`
///
/// The reader is consumed and dropped on every return path, which closes
/// the underlying file. A trailing `\r` is stripped so CRLF files read the
/// same as LF files. Invalid UTF-8 in the returned line is replaced with
/// U+FFFD.
pub async fn locate<R>(mut reader: R, line_number: u64) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    if line_number == 0 {
        return Err(Error::NotFound(line_number));
    }

    let mut current = 1u64;
    while current < line_number {
        let (terminated, used) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Err(Error::NotFound(line_number));
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(pos) => (true, pos + 1),
                None => (false, available.len()),
            }
        };
        reader.consume(used);
        if terminated {
            current += 1;
        }
    }

    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line).await? == 0 {
        return Err(Error::NotFound(line_number));
    }

    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }

    Ok(match String::from_utf8(line) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
