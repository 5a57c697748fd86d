use std::path::Path;

use crate::archive::{
    Archive, ArchiveMember, BundleArchive, BundleError, DirArchive, MemberStream, join,
    relative_to,
};

/// Virtual folder the game's asset loader sees.
pub const PUBLIC_FOLDER: &str = "data";

#[derive(Debug, thiserror::Error)]
pub enum DataArchiveError {
    #[error(transparent)]
    Bundle(#[from] BundleError),
    #[error(
        "data bundle is version {found_major}.{found_minor}, but this engine needs \
         {required_major}.{required_minor}"
    )]
    VersionMismatch {
        found_major: u16,
        found_minor: u16,
        required_major: u16,
        required_minor: u16,
    },
    #[error("data bundle has no {0:?} folder")]
    MissingFolder(String),
}

/// Remaps one subfolder of a backing archive onto the virtual `data/` path.
///
/// Each game's assets live under a game-specific folder inside the shared
/// bundle; wrapping that folder lets the loading code ask for plain
/// `data/...` names. Requests outside `data/` never reach the backing
/// archive.
pub struct DataArchive {
    backing: Box<dyn Archive>,
    inner_folder: String,
}

impl DataArchive {
    fn new(backing: Box<dyn Archive>, inner_folder: impl Into<String>) -> Self {
        DataArchive {
            backing,
            inner_folder: inner_folder.into(),
        }
    }

    /// Mounts the game data.
    ///
    /// When `override_dir` is given and contains `subfolder`, that loose
    /// directory wins over the packaged bundle, so data edits don't require
    /// repacking. Otherwise the bundle at `bundle_path` is opened and its
    /// format version checked: the major version must match exactly and the
    /// minor version must be at least the required one.
    pub fn load(
        bundle_path: &Path,
        subfolder: &str,
        required_major: u16,
        required_minor: u16,
        override_dir: Option<&Path>,
    ) -> Result<Self, DataArchiveError> {
        if let Some(dir) = override_dir {
            let root = DirArchive::new(dir);
            if root.is_path_directory(subfolder) {
                log::info!(
                    "using loose data files from {} instead of the bundle",
                    dir.display()
                );
                return Ok(Self::new(Box::new(root), subfolder));
            }
        }

        let bundle = BundleArchive::open(bundle_path)?;
        let (found_major, found_minor) = (bundle.major_version(), bundle.minor_version());
        if found_major != required_major || found_minor < required_minor {
            return Err(DataArchiveError::VersionMismatch {
                found_major,
                found_minor,
                required_major,
                required_minor,
            });
        }
        if !bundle.is_path_directory(subfolder) {
            return Err(DataArchiveError::MissingFolder(subfolder.to_owned()));
        }
        Ok(Self::new(Box::new(bundle), subfolder))
    }

    /// Builds a data archive over an already-open backing archive.
    pub fn over(backing: Box<dyn Archive>, subfolder: impl Into<String>) -> Self {
        Self::new(backing, subfolder)
    }

    /// Rewrites a public `data/...` path to its backing-archive name.
    fn to_inner(&self, path: &str) -> Option<String> {
        let rest = relative_to(path, PUBLIC_FOLDER)?;
        Some(join(&self.inner_folder, rest))
    }

    /// Rewrites a backing-archive name back under `data/`.
    fn to_public(&self, inner: &str) -> Option<String> {
        let rest = relative_to(inner, &self.inner_folder)?;
        Some(join(PUBLIC_FOLDER, rest))
    }
}

impl Archive for DataArchive {
    fn has_file(&self, path: &str) -> bool {
        self.to_inner(path)
            .is_some_and(|inner| self.backing.has_file(&inner))
    }

    fn list_members(&self, list: &mut Vec<ArchiveMember>) -> usize {
        let mut inner = Vec::new();
        self.backing.list_members(&mut inner);
        let before = list.len();
        list.extend(inner.iter().filter_map(|member| {
            let name = self.to_public(member.name())?;
            Some(ArchiveMember::new(name, member.size()))
        }));
        list.len() - before
    }

    fn member(&self, path: &str) -> Option<ArchiveMember> {
        let inner = self.to_inner(path)?;
        let member = self.backing.member(&inner)?;
        Some(ArchiveMember::new(path, member.size()))
    }

    fn open_member(&self, path: &str) -> Option<Box<dyn MemberStream>> {
        let inner = self.to_inner(path)?;
        self.backing.open_member(&inner)
    }

    fn is_path_directory(&self, path: &str) -> bool {
        if path.trim_end_matches('/') == PUBLIC_FOLDER {
            return true;
        }
        self.to_inner(path)
            .is_some_and(|inner| self.backing.is_path_directory(&inner))
    }
}

#[cfg(test)]
mod tests {
    use crate::archive::bundle::BundleBuilder;

    use super::*;

    fn sample_archive() -> DataArchive {
        let mut builder = BundleBuilder::new(1, 0);
        builder
            .add_file("forest/rooms/101.bin", vec![1, 2, 3])
            .add_file("forest/subfont.bin", vec![9])
            .add_file("meadow/rooms/201.bin", vec![4]);
        let bundle = BundleArchive::from_bytes(builder.build().unwrap()).unwrap();
        DataArchive::over(Box::new(bundle), "forest")
    }

    #[test]
    fn remaps_public_paths() {
        let archive = sample_archive();
        assert!(archive.has_file("data/rooms/101.bin"));
        assert!(archive.has_file("data/subfont.bin"));
        assert_eq!(archive.member("data/rooms/101.bin").unwrap().size(), 3);
    }

    #[test]
    fn rejects_paths_outside_public_folder() {
        let archive = sample_archive();
        // The backing archive has these, but they are not reachable through
        // the public view.
        assert!(!archive.has_file("forest/rooms/101.bin"));
        assert!(!archive.has_file("meadow/rooms/201.bin"));
        assert!(!archive.has_file("database/rooms.bin"));
        assert!(archive.member("rooms/101.bin").is_none());
        assert!(archive.open_member("forest/subfont.bin").is_none());
    }

    #[test]
    fn listing_reprefixes_and_filters_other_games() {
        let archive = sample_archive();
        let mut list = Vec::new();
        let added = archive.list_members(&mut list);
        assert_eq!(added, 2);
        let mut names: Vec<_> = list.iter().map(ArchiveMember::name).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["data/rooms/101.bin", "data/subfont.bin"]);
    }

    #[test]
    fn directory_checks_follow_the_remap() {
        let archive = sample_archive();
        assert!(archive.is_path_directory("data"));
        assert!(archive.is_path_directory("data/rooms"));
        assert!(!archive.is_path_directory("forest/rooms"));
    }

    #[test]
    fn load_rejects_version_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fernwood.dat");
        let mut builder = BundleBuilder::new(1, 1);
        builder.add_file("forest/rooms/101.bin", vec![1]);
        std::fs::write(&path, builder.build().unwrap()).unwrap();

        assert!(DataArchive::load(&path, "forest", 1, 0, None).is_ok());
        assert!(DataArchive::load(&path, "forest", 1, 1, None).is_ok());
        assert!(matches!(
            DataArchive::load(&path, "forest", 2, 0, None),
            Err(DataArchiveError::VersionMismatch { .. })
        ));
        assert!(matches!(
            DataArchive::load(&path, "forest", 1, 2, None),
            Err(DataArchiveError::VersionMismatch { .. })
        ));
        assert!(matches!(
            DataArchive::load(&path, "meadow", 1, 0, None),
            Err(DataArchiveError::MissingFolder(_))
        ));
    }

    #[test]
    fn load_prefers_override_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("forest/rooms")).unwrap();
        std::fs::write(dir.path().join("forest/rooms/101.bin"), b"loose").unwrap();

        let bundle_path = dir.path().join("missing.dat");
        let archive =
            DataArchive::load(&bundle_path, "forest", 1, 0, Some(dir.path())).unwrap();
        assert!(archive.has_file("data/rooms/101.bin"));
    }
}
