//! Stream helpers shared by the PAC codecs

use std::io::{self, Read, Seek, SeekFrom};

/// Chunk size used when scanning for a NUL terminator
const SCAN_CHUNK: usize = 256;

/// Read until `buf` is full or the stream ends, returning the bytes read.
///
/// Unlike `read_exact`, a short stream is not an error; the caller decides
/// what a short count means.
pub fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read a NUL-terminated byte string starting at `offset`.
///
/// Returns the bytes before the terminator, or `None` if the stream ends
/// first. The reader is left at an unspecified position.
pub fn read_null_terminated_at<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
) -> io::Result<Option<Vec<u8>>> {
    reader.seek(SeekFrom::Start(offset))?;

    let mut bytes = Vec::new();
    let mut chunk = [0u8; SCAN_CHUNK];
    loop {
        let n = read_full(reader, &mut chunk)?;
        if let Some(end) = chunk[..n].iter().position(|&b| b == 0) {
            bytes.extend_from_slice(&chunk[..end]);
            return Ok(Some(bytes));
        }
        bytes.extend_from_slice(&chunk[..n]);
        if n < SCAN_CHUNK {
            return Ok(None);
        }
    }
}

/// Total length of a seekable stream. Leaves the cursor at the end.
pub fn stream_len<S: Seek>(stream: &mut S) -> io::Result<u64> {
    stream.seek(SeekFrom::End(0))
}
