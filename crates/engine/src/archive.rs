//! Access to bundles of named game assets.
//!
//! Member names are virtual slash-separated paths, independent of the host
//! filesystem. The engine only ever reads assets through the [`Archive`]
//! trait, so the same loading code works against the packaged data bundle,
//! a loose directory of files, or the `data/`-remapping view over either.

use std::io::{Read, Seek};

mod bundle;
mod data;
mod dir;
mod pattern;

pub use bundle::{BundleArchive, BundleBuilder, BundleError};
pub use data::{DataArchive, DataArchiveError};
pub use dir::DirArchive;

/// Seekable read stream over a single archive member.
pub trait MemberStream: Read + Seek {}

impl<T: Read + Seek> MemberStream for T {}

/// Metadata for one file inside an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    name: String,
    size: u64,
}

impl ArchiveMember {
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        ArchiveMember {
            name: name.into(),
            size,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// A bundle of named assets.
///
/// The two listing methods must only append to `list`, never remove from
/// it, and return the number of members they added.
pub trait Archive {
    /// Exact existence check; patterns are not allowed here.
    fn has_file(&self, path: &str) -> bool;

    /// Appends every member to `list`.
    fn list_members(&self, list: &mut Vec<ArchiveMember>) -> usize;

    /// Appends every member whose name matches `pattern` (`*` and `?`
    /// wildcards). `*` stays within one path component unless
    /// `match_path_components` is set.
    fn list_matching_members(
        &self,
        list: &mut Vec<ArchiveMember>,
        pattern: &str,
        match_path_components: bool,
    ) -> usize {
        let mut all = Vec::new();
        self.list_members(&mut all);
        let before = list.len();
        list.extend(
            all.into_iter()
                .filter(|m| pattern::matches(pattern, m.name(), match_path_components)),
        );
        list.len() - before
    }

    /// Metadata for the member at `path`, if present.
    fn member(&self, path: &str) -> Option<ArchiveMember>;

    /// Opens a read stream over the member at `path`. Returns `None` when
    /// the member does not exist or cannot be opened.
    fn open_member(&self, path: &str) -> Option<Box<dyn MemberStream>>;

    /// Whether `path` names a directory inside the archive.
    fn is_path_directory(&self, path: &str) -> bool;
}

/// Returns the remainder of `path` below `prefix`, treating both as
/// slash-separated virtual paths. `None` when `path` is not under `prefix`.
#[must_use]
pub fn relative_to<'p>(path: &'p str, prefix: &str) -> Option<&'p str> {
    let prefix = prefix.trim_end_matches('/');
    let rest = path.strip_prefix(prefix)?;
    rest.strip_prefix('/').filter(|r| !r.is_empty())
}

/// Joins two virtual path fragments with a single slash.
#[must_use]
pub fn join(base: &str, rest: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_to_strips_prefix() {
        assert_eq!(relative_to("data/rooms/101.bin", "data"), Some("rooms/101.bin"));
        assert_eq!(relative_to("data/rooms/101.bin", "data/"), Some("rooms/101.bin"));
    }

    #[test]
    fn relative_to_rejects_foreign_paths() {
        assert_eq!(relative_to("other/rooms/101.bin", "data"), None);
        assert_eq!(relative_to("database/rooms.bin", "data"), None);
        assert_eq!(relative_to("data/", "data"), None);
        assert_eq!(relative_to("data", "data"), None);
    }

    #[test]
    fn join_normalizes_slashes() {
        assert_eq!(join("forest/", "rooms/101.bin"), "forest/rooms/101.bin");
        assert_eq!(join("forest", "rooms/101.bin"), "forest/rooms/101.bin");
    }
}
