//! Expansion of the sparse LEB stream written by mkfs.ubifs into a flat,
//! gapless image. The stream is a bare concatenation of records, each a
//! native-endian `u32` destination index followed by exactly one LEB of
//! payload; every index the stream skips is materialized as an erased
//! (all-0xFF) block.

mod structs;

pub use structs::*;

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("LEB size must be non-zero")]
    ZeroLebSize,
    #[error("stream ended inside a block index: got {got} of {expected} bytes")]
    TruncatedIndex { got: usize, expected: usize },
    #[error("stream ended inside the payload of LEB {index}: got {got} of {expected} bytes")]
    TruncatedPayload {
        index: u32,
        got: usize,
        expected: usize,
    },
    #[error("LEB {index} is behind the output cursor {cursor}; indices must be strictly increasing")]
    OutOfOrder { index: u32, cursor: u64 },
    #[error("cannot open source \"{path}\": {source}")]
    OpenSource {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot create \"{path}\": {source}")]
    CreateDest {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

type Result<T> = color_eyre::Result<T, Error>;

/// Byte value of an unprogrammed flash cell.
pub const ERASE_BYTE: u8 = 0xff;

/// Expand the sparse `(index, payload)` stream from `source` into a gapless
/// flat image on `dest`.
///
/// A clean end-of-stream at a record boundary terminates successfully; an
/// empty stream yields an empty image. Any short read inside a record, or an
/// index behind the cursor, aborts the run. Output already written stays on
/// disk in that case.
pub fn materialize<R: Read, W: Write>(
    source: &mut R,
    dest: &mut W,
    opts: &MaterializeOpts,
) -> Result<Summary> {
    if opts.leb_size == 0 {
        return Err(Error::ZeroLebSize);
    }

    // One buffer serves both fill and payload blocks across the whole run.
    let mut buf = vec![0u8; opts.leb_size];
    let mut cursor: u64 = 0;
    let mut summary = Summary::default();

    loop {
        let mut index_buf = [0u8; size_of::<u32>()];
        let got = read_fully(source, &mut index_buf)?;
        if got == 0 {
            break;
        }
        if got != index_buf.len() {
            return Err(Error::TruncatedIndex {
                got,
                expected: index_buf.len(),
            });
        }
        // The producer writes a native-endian `unsigned int`.
        let index = u32::from_ne_bytes(index_buf);

        if u64::from(index) < cursor {
            return Err(Error::OutOfOrder { index, cursor });
        }

        let gap = u64::from(index) - cursor;
        if gap > 0 {
            buf.fill(ERASE_BYTE);
            for _ in 0..gap {
                dest.write_all(&buf)?;
            }
            cursor += gap;
            summary.fill_blocks += gap;
            debug!(index, gap, "padded unmapped LEBs");
        }

        let got = read_fully(source, &mut buf)?;
        if got != opts.leb_size {
            return Err(Error::TruncatedPayload {
                index,
                got,
                expected: opts.leb_size,
            });
        }
        dest.write_all(&buf)?;
        cursor += 1;
        summary.data_blocks += 1;
    }

    dest.flush()?;
    Ok(summary)
}

/// Open `source` read-only, create (truncating) `dest`, and run
/// [`materialize`] over buffered handles.
pub fn materialize_file(source: &Path, dest: &Path, opts: &MaterializeOpts) -> Result<Summary> {
    let input = File::open(source).map_err(|e| Error::OpenSource {
        path: source.to_path_buf(),
        source: e,
    })?;
    let output = File::create(dest).map_err(|e| Error::CreateDest {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let mut reader = BufReader::new(input);
    let mut writer = BufWriter::new(output);
    let summary = materialize(&mut reader, &mut writer, opts)?;

    info!(
        source = %source.display(),
        dest = %dest.display(),
        data_blocks = summary.data_blocks,
        fill_blocks = summary.fill_blocks,
        image_bytes = summary.total_blocks() * opts.leb_size as u64,
        "materialized flat image"
    );
    Ok(summary)
}

/// Read until `buf` is full or the stream ends, returning the byte count.
/// Lets the caller tell a clean end-of-stream (0) from a truncated record.
fn read_fully<R: Read>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
