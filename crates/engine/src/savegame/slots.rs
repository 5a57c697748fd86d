use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use fernwood_utils::IoDataReader;

use crate::savegame::header::read_save_header;

/// Filename for a numbered save slot, e.g. `fernwood.003`.
#[must_use]
pub fn savegame_filename(target: &str, slot: u16) -> String {
    format!("{target}.{slot:03}")
}

fn parse_slot(file_name: &str, target: &str) -> Option<u16> {
    let rest = file_name.strip_prefix(target)?.strip_prefix('.')?;
    if rest.len() != 3 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// One save slot found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSlotInfo {
    pub slot: u16,
    pub description: String,
    pub play_time: u32,
    pub path: PathBuf,
}

/// Scans `dir` for save files belonging to `target`, ordered by slot.
///
/// Files that carry a slot-shaped name but fail the header check are
/// reported in the log and left out, so one corrupt save doesn't hide the
/// rest of the list.
pub fn list_savegames(dir: &Path, target: &str) -> io::Result<Vec<SaveSlotInfo>> {
    let mut slots = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        let Some(slot) = parse_slot(&file_name, target) else {
            continue;
        };
        let path = entry.path();
        let mut reader = IoDataReader::new(BufReader::new(File::open(&path)?));
        match read_save_header(&mut reader, true) {
            Ok(header) => slots.push(SaveSlotInfo {
                slot,
                description: header.description,
                play_time: header.play_time,
                path,
            }),
            Err(err) => {
                log::warn!("ignoring unreadable save {}: {err}", path.display());
            }
        }
    }
    slots.sort_by_key(|info| info.slot);
    Ok(slots)
}

/// Deletes the save file for `slot`, if present.
pub fn remove_savegame(dir: &Path, target: &str, slot: u16) -> io::Result<()> {
    let path = dir.join(savegame_filename(target, slot));
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}
