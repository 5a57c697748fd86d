use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufReader, Cursor, Seek, Write},
    path::Path,
};

use fernwood_utils::{DataReader, DataWriter, IoDataReader, IoDataWriter};

use crate::archive::{Archive, ArchiveMember, MemberStream};

/// File magic of a Fernwood data bundle.
pub const BUNDLE_MAGIC: &[u8; 5] = b"FWDAT";

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("not a fernwood data bundle (bad magic)")]
    InvalidMagic,
    #[error("bundle entry {name:?} ({offset:#x}+{size}) extends past end of bundle ({len})")]
    EntryOutOfBounds {
        name: String,
        offset: u32,
        size: u32,
        len: u64,
    },
    #[error("duplicate bundle entry {0:?}")]
    DuplicateEntry(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy)]
struct BundleEntry {
    offset: u32,
    size: u32,
}

/// The packaged game data file.
///
/// Layout (all integers little-endian): `FWDAT` magic, `u16` major and
/// `u16` minor format version, `u32` entry count, then per entry a
/// length-prefixed name, `u32` payload offset (absolute) and `u32` size,
/// followed by the payload bytes.
#[derive(Debug)]
pub struct BundleArchive {
    data: Vec<u8>,
    entries: BTreeMap<String, BundleEntry>,
    major: u16,
    minor: u16,
}

impl BundleArchive {
    pub fn open(path: &Path) -> Result<Self, BundleError> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut data = Vec::new();
        io::Read::read_to_end(&mut reader, &mut data)?;
        Self::from_bytes(data)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, BundleError> {
        let len = data.len() as u64;
        let mut reader = IoDataReader::new(Cursor::new(&data));

        let mut magic = [0u8; 5];
        reader.read_exact(&mut magic).map_err(|err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                BundleError::InvalidMagic
            } else {
                BundleError::Io(err)
            }
        })?;
        if &magic != BUNDLE_MAGIC {
            return Err(BundleError::InvalidMagic);
        }

        let major = reader.read_u16_le()?;
        let minor = reader.read_u16_le()?;
        let count = reader.read_u32_le()?;

        let mut entries = BTreeMap::new();
        for _ in 0..count {
            let name = reader.read_str_u16()?;
            let offset = reader.read_u32_le()?;
            let size = reader.read_u32_le()?;
            if u64::from(offset) + u64::from(size) > len {
                return Err(BundleError::EntryOutOfBounds {
                    name,
                    offset,
                    size,
                    len,
                });
            }
            if entries
                .insert(name.clone(), BundleEntry { offset, size })
                .is_some()
            {
                return Err(BundleError::DuplicateEntry(name));
            }
        }

        log::debug!(
            "opened bundle v{major}.{minor} with {} entries",
            entries.len()
        );
        Ok(BundleArchive {
            data,
            entries,
            major,
            minor,
        })
    }

    #[must_use]
    pub fn major_version(&self) -> u16 {
        self.major
    }

    #[must_use]
    pub fn minor_version(&self) -> u16 {
        self.minor
    }

    fn entry_bytes(&self, entry: BundleEntry) -> Vec<u8> {
        let start = entry.offset as usize;
        let end = start + entry.size as usize;
        // Bounds were validated when the table was read.
        self.data[start..end].to_vec()
    }
}

impl Archive for BundleArchive {
    fn has_file(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    fn list_members(&self, list: &mut Vec<ArchiveMember>) -> usize {
        let before = list.len();
        list.extend(
            self.entries
                .iter()
                .map(|(name, entry)| ArchiveMember::new(name.clone(), u64::from(entry.size))),
        );
        list.len() - before
    }

    fn member(&self, path: &str) -> Option<ArchiveMember> {
        let entry = self.entries.get(path)?;
        Some(ArchiveMember::new(path, u64::from(entry.size)))
    }

    fn open_member(&self, path: &str) -> Option<Box<dyn MemberStream>> {
        let entry = *self.entries.get(path)?;
        Some(Box::new(Cursor::new(self.entry_bytes(entry))))
    }

    fn is_path_directory(&self, path: &str) -> bool {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        self.entries.keys().any(|name| name.starts_with(&prefix))
    }
}

/// Assembles a data bundle in memory, for the packing tool and tests.
pub struct BundleBuilder {
    major: u16,
    minor: u16,
    files: Vec<(String, Vec<u8>)>,
}

impl BundleBuilder {
    #[must_use]
    pub fn new(major: u16, minor: u16) -> Self {
        BundleBuilder {
            major,
            minor,
            files: Vec::new(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, data: Vec<u8>) -> &mut Self {
        self.files.push((name.into(), data));
        self
    }

    pub fn write_to<W: Write + Seek>(&self, writer: W) -> io::Result<()> {
        let mut out = IoDataWriter::new(writer);
        out.write_all(BUNDLE_MAGIC)?;
        out.write_u16_le(self.major)?;
        out.write_u16_le(self.minor)?;
        out.write_u32_le(u32::try_from(self.files.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "too many bundle entries")
        })?)?;

        // Header size is known only after the names are counted, so lay the
        // table out first, then the payloads in declaration order.
        let table_size: usize = self
            .files
            .iter()
            .map(|(name, _)| 2 + name.len() + 4 + 4)
            .sum();
        let mut offset = (5 + 2 + 2 + 4 + table_size) as u64;
        for (name, data) in &self.files {
            out.write_str_u16(name)?;
            let (entry_offset, entry_size) = checked_entry(offset, data.len() as u64)?;
            out.write_u32_le(entry_offset)?;
            out.write_u32_le(entry_size)?;
            offset += u64::from(entry_size);
        }
        for (_, data) in &self.files {
            out.write_all(data)?;
        }
        Ok(())
    }

    pub fn build(&self) -> io::Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.write_to(&mut buf)?;
        Ok(buf.into_inner())
    }
}

// Offsets and sizes are u32 in the entry table; payloads that would push
// either past that range cannot be represented.
fn checked_entry(offset: u64, size: u64) -> io::Result<(u32, u32)> {
    let too_big =
        || io::Error::new(io::ErrorKind::InvalidInput, "bundle payload exceeds 4 GiB");
    Ok((
        u32::try_from(offset).map_err(|_| too_big())?,
        u32::try_from(size).map_err(|_| too_big())?,
    ))
}
