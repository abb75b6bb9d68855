//! Binary manifest layout
//!
//! Little-endian throughout:
//!
//! ```text
//! magic "HDRMANIF" | major u16 | minor u16 | count u32
//! count x ( path_len u32 | path | secs i64 | nanos u32
//!           | component_count u32 | component_count x ( len u32 | name ) )
//! ```
//!
//! The version is checked before any entry is decoded. Trailing bytes are
//! treated as corruption.

use super::ManifestEntry;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

const MAGIC: &[u8; 8] = b"HDRMANIF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ManifestVersion {
    pub major: u16,
    pub minor: u16,
}

impl ManifestVersion {
    pub const CURRENT: ManifestVersion = ManifestVersion { major: 1, minor: 0 };

    /// Older and equal majors are readable; minor revisions only add data
    pub fn is_supported(&self) -> bool {
        self.major <= Self::CURRENT.major
    }
}

impl fmt::Display for ManifestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Corrupt(String),
    UnsupportedVersion(ManifestVersion),
}

pub type Entries = BTreeMap<PathBuf, ManifestEntry>;

pub fn encode(entries: &Entries) -> Result<Vec<u8>, PathBuf> {
    let mut out = Vec::with_capacity(16 + entries.len() * 64);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&ManifestVersion::CURRENT.major.to_le_bytes());
    out.extend_from_slice(&ManifestVersion::CURRENT.minor.to_le_bytes());
    write_len(&mut out, entries.len());

    for (path, entry) in entries {
        let text = path.to_str().ok_or_else(|| path.clone())?;
        write_str(&mut out, text);
        out.extend_from_slice(&entry.modified.timestamp().to_le_bytes());
        out.extend_from_slice(&entry.modified.timestamp_subsec_nanos().to_le_bytes());
        write_len(&mut out, entry.components.len());
        for component in &entry.components {
            write_str(&mut out, component);
        }
    }
    Ok(out)
}

pub fn decode(data: &[u8]) -> Result<(ManifestVersion, Entries), DecodeError> {
    let mut reader = Reader { data, pos: 0 };

    if reader.take(MAGIC.len())? != MAGIC {
        return Err(DecodeError::Corrupt("bad magic".to_string()));
    }
    let version = ManifestVersion {
        major: reader.u16()?,
        minor: reader.u16()?,
    };
    if !version.is_supported() {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let count = reader.u32()?;
    let mut entries = BTreeMap::new();
    for _ in 0..count {
        let path = PathBuf::from(reader.string()?);
        let secs = reader.i64()?;
        let nanos = reader.u32()?;
        let modified = DateTime::<Utc>::from_timestamp(secs, nanos).ok_or_else(|| {
            DecodeError::Corrupt(format!("invalid timestamp {}.{}", secs, nanos))
        })?;
        let component_count = reader.u32()?;
        let components = (0..component_count)
            .map(|_| reader.string())
            .collect::<Result<BTreeSet<_>, _>>()?;
        entries.insert(
            path,
            ManifestEntry {
                modified,
                components,
            },
        );
    }

    if reader.pos != data.len() {
        return Err(DecodeError::Corrupt(format!(
            "{} trailing bytes",
            data.len() - reader.pos
        )));
    }
    Ok((version, entries))
}

/// Sibling path the manifest is written to before being renamed into place
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_len(out: &mut Vec<u8>, len: usize) {
    out.extend_from_slice(&(len as u32).to_le_bytes());
}

fn write_str(out: &mut Vec<u8>, text: &str) {
    write_len(out, text.len());
    out.extend_from_slice(text.as_bytes());
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| DecodeError::Corrupt(format!("truncated at byte {}", self.pos)))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn u16(&mut self) -> Result<u16, DecodeError> {
        self.array().map(u16::from_le_bytes)
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        self.array().map(u32::from_le_bytes)
    }

    fn i64(&mut self) -> Result<i64, DecodeError> {
        self.array().map(i64::from_le_bytes)
    }

    fn string(&mut self) -> Result<String, DecodeError> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| DecodeError::Corrupt(format!("invalid UTF-8 before byte {}", self.pos)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn entries() -> Entries {
        let mut entries = Entries::new();
        entries.insert(
            PathBuf::from("/src/widget.h"),
            ManifestEntry {
                modified: DateTime::<Utc>::from_timestamp(1_700_000_000, 123_456_789).unwrap(),
                components: ["WidgetComponent".to_string()].into_iter().collect(),
            },
        );
        entries.insert(
            PathBuf::from("/src/empty.h"),
            ManifestEntry {
                modified: DateTime::<Utc>::from_timestamp(5, 0).unwrap(),
                components: BTreeSet::new(),
            },
        );
        entries
    }

    #[test]
    fn test_decode_reproduces_entries() {
        let bytes = encode(&entries()).unwrap();
        let (version, decoded) = decode(&bytes).unwrap();
        assert_eq!(version, ManifestVersion::CURRENT);
        assert_eq!(decoded, entries());
    }

    #[test]
    fn test_newer_major_rejected_before_entries() {
        let mut bytes = encode(&entries()).unwrap();
        bytes[8..10].copy_from_slice(&2u16.to_le_bytes());
        // Garbage after the header must not matter once the version fails.
        bytes.truncate(14);

        assert_matches!(
            decode(&bytes),
            Err(DecodeError::UnsupportedVersion(ManifestVersion { major: 2, minor: 0 }))
        );
    }

    #[test]
    fn test_newer_minor_is_readable() {
        let mut bytes = encode(&entries()).unwrap();
        bytes[10..12].copy_from_slice(&7u16.to_le_bytes());
        let (version, decoded) = decode(&bytes).unwrap();
        assert_eq!(version.minor, 7);
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn test_corruption_is_detected() {
        let bytes = encode(&entries()).unwrap();

        assert_matches!(decode(b"NOTAMANIFEST"), Err(DecodeError::Corrupt(_)));
        assert_matches!(decode(&bytes[..bytes.len() - 3]), Err(DecodeError::Corrupt(_)));

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert_matches!(decode(&trailing), Err(DecodeError::Corrupt(reason)) if reason.contains("trailing"));
    }

    #[test]
    fn test_temp_path_is_a_sibling() {
        assert_eq!(
            temp_path(Path::new("/bin/header_manifest")),
            PathBuf::from("/bin/header_manifest.tmp")
        );
    }
}
