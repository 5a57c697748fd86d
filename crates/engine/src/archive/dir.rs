use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use crate::archive::{Archive, ArchiveMember, MemberStream};

/// A directory of loose files exposed through the [`Archive`] trait.
///
/// Used as the development override for the packaged bundle: pointing the
/// engine at a checkout of the game data lets files be edited without
/// repacking. Member names use `/` regardless of the host platform, and
/// names that try to escape the root (`..`, absolute paths) are rejected.
pub struct DirArchive {
    root: PathBuf,
}

impl DirArchive {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirArchive { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        if path.is_empty() {
            return None;
        }
        let mut resolved = self.root.clone();
        for component in path.split('/') {
            if component.is_empty() || component == "." || component == ".." {
                return None;
            }
            resolved.push(component);
        }
        Some(resolved)
    }

    fn collect_members(
        &self,
        dir: &Path,
        prefix: &str,
        list: &mut Vec<ArchiveMember>,
    ) -> io::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
                log::warn!("skipping non-UTF-8 file name under {}", dir.display());
                continue;
            };
            let name = if prefix.is_empty() {
                file_name
            } else {
                format!("{prefix}/{file_name}")
            };
            if file_type.is_dir() {
                self.collect_members(&entry.path(), &name, list)?;
            } else if file_type.is_file() {
                list.push(ArchiveMember::new(name, entry.metadata()?.len()));
            }
        }
        Ok(())
    }
}

impl Archive for DirArchive {
    fn has_file(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }

    fn list_members(&self, list: &mut Vec<ArchiveMember>) -> usize {
        let before = list.len();
        if let Err(err) = self.collect_members(&self.root, "", list) {
            log::warn!("error listing {}: {err}", self.root.display());
        }
        list.len() - before
    }

    fn member(&self, path: &str) -> Option<ArchiveMember> {
        let resolved = self.resolve(path)?;
        let meta = std::fs::metadata(&resolved).ok()?;
        meta.is_file()
            .then(|| ArchiveMember::new(path, meta.len()))
    }

    fn open_member(&self, path: &str) -> Option<Box<dyn MemberStream>> {
        let resolved = self.resolve(path)?;
        match File::open(&resolved) {
            Ok(file) => Some(Box::new(file)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                log::warn!("failed to open {}: {err}", resolved.display());
                None
            }
        }
    }

    fn is_path_directory(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_dir())
    }
}
