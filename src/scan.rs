use memchr::memchr;

use crate::error::ScanError;
use crate::parse::parse_fixed;
use crate::table::PartitionTable;

/// Byte separating a key from its value.
pub const SEPARATOR: u8 = b';';

/// Scans the lines starting inside `span[..length]` into `tbl`.
///
/// `span` may extend past `length` up to the end of the mapping: a line that
/// starts inside the chunk is finished from the bytes after it. When
/// `at_line_start` is false the leading partial line is skipped, since the
/// previous chunk owns it. A final line with no trailing newline is treated
/// as terminated by the end of `span`.
///
/// Returns the number of lines folded into the table. Error offsets are
/// relative to `span`.
pub fn scan(
    span: &[u8],
    length: usize,
    tbl: &mut PartitionTable,
    at_line_start: bool,
) -> Result<u64, ScanError> {
    let length = length.min(span.len());
    let mut idx = 0;
    if !at_line_start {
        idx = match memchr(b'\n', span) {
            Some(nl) => nl + 1,
            None => return Ok(0),
        };
    }

    let mut lines = 0;
    while idx < length {
        let end = memchr(b'\n', &span[idx..]).map_or(span.len(), |nl| idx + nl);
        let line = &span[idx..end];

        let Some(sep) = memchr(SEPARATOR, line) else {
            return Err(ScanError::MissingSeparator { offset: idx as u64 });
        };
        let value = parse_fixed(&line[sep + 1..]);
        tbl.accumulate(&line[..sep], value)
            .map_err(|source| ScanError::Table {
                offset: idx as u64,
                source,
            })?;

        lines += 1;
        idx = end + 1;
    }

    Ok(lines)
}

/// Whether a chunk starting at `start` begins a fresh line.
#[inline]
pub fn starts_at_line_boundary(data: &[u8], start: usize) -> bool {
    start == 0 || data.get(start - 1) == Some(&b'\n')
}
