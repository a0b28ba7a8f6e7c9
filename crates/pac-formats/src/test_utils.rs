//! Test utilities for PAC round-trip testing

use crate::PacFormat;
use std::fmt::Debug;

/// Test round-trip serialization for a format instance
///
/// The instance must already carry the pointer values the encoder assigns
/// (see `PacArchive::relocated`), otherwise the comparison fails.
pub fn test_round_trip<T>(original: &T) -> Result<(), Box<dyn std::error::Error>>
where
    T: PacFormat + PartialEq + Debug,
{
    let data = original.build()?;
    let parsed = T::parse(&data)?;

    if original != &parsed {
        return Err(format!(
            "Round-trip verification failed:\nOriginal: {:?}\nParsed: {:?}",
            original, parsed
        )
        .into());
    }

    Ok(())
}

/// Hand-assembled PAC bytes, independent of the crate's encoder.
///
/// Payloads are placed right after the index in reverse entry order, and
/// filenames after the payloads, so decoding has to follow every pointer.
#[derive(Default)]
pub struct PacFixture {
    entries: Vec<(String, Vec<u8>)>,
}

impl PacFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, name: &str, data: &[u8]) -> Self {
        self.entries.push((name.to_string(), data.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let count = self.entries.len() as u32;
        let index_end = 32 + 32 * count;

        let mut data_ptrs = vec![0u32; self.entries.len()];
        let mut cursor = index_end;
        for (i, (_, payload)) in self.entries.iter().enumerate().rev() {
            data_ptrs[i] = cursor;
            cursor += payload.len() as u32;
        }
        let mut name_ptrs = Vec::with_capacity(self.entries.len());
        for (name, _) in &self.entries {
            name_ptrs.push(cursor);
            cursor += name.len() as u32 + 1;
        }

        let mut out = Vec::new();
        out.extend_from_slice(b"add\0");
        for field in [4u32, 32, 32, count, cursor] {
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.resize(32, 0);
        for (i, (_, payload)) in self.entries.iter().enumerate() {
            for field in [data_ptrs[i], payload.len() as u32, 0, 0, name_ptrs[i]] {
                out.extend_from_slice(&field.to_le_bytes());
            }
            out.resize(32 + 32 * (i + 1), 0);
        }
        for (_, payload) in self.entries.iter().rev() {
            out.extend_from_slice(payload);
        }
        for (name, _) in &self.entries {
            out.extend_from_slice(name.as_bytes());
            out.push(0);
        }
        out
    }
}
