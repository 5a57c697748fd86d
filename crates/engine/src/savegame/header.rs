use std::io;

use fernwood_utils::{DataReader, DataWriter};

use crate::savegame::thumbnail::Thumbnail;

/// Signature at the start of every Fernwood save file.
pub const SAVEGAME_MAGIC: &[u8; 4] = b"FWSV";

/// Current save format version. Older saves load; newer ones are rejected.
pub const SAVEGAME_VERSION: u32 = 2;

/// Game identifier stored in the header, so saves from other games sharing
/// the container format can be told apart.
pub const GAME_ID: u8 = 11;

/// Marks a save made by the engine rather than the player.
pub const SAVE_FLAG_AUTOSAVE: u32 = 1;

/// Everything the save/load UI needs without deserializing game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveHeader {
    pub description: String,
    pub version: u32,
    pub game_id: u8,
    pub flags: u32,
    /// Packed `(year << 16) | (month << 8) | day`.
    pub save_date: u32,
    /// Packed `(hour << 8) | minute`.
    pub save_time: u32,
    /// Total play time in seconds.
    pub play_time: u32,
    pub thumbnail: Option<Thumbnail>,
}

/// The ways reading a save header can fail.
#[derive(Debug, thiserror::Error)]
pub enum SaveHeaderError {
    #[error("not a fernwood save file")]
    InvalidType,
    #[error("save file version {0} is newer than supported version {SAVEGAME_VERSION}")]
    InvalidVersion(u32),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[must_use]
pub fn pack_date(year: u16, month: u8, day: u8) -> u32 {
    (u32::from(year) << 16) | (u32::from(month) << 8) | u32::from(day)
}

#[must_use]
pub fn unpack_date(date: u32) -> (u16, u8, u8) {
    ((date >> 16) as u16, (date >> 8) as u8, date as u8)
}

#[must_use]
pub fn pack_time(hour: u8, minute: u8) -> u32 {
    (u32::from(hour) << 8) | u32::from(minute)
}

#[must_use]
pub fn unpack_time(time: u32) -> (u8, u8) {
    ((time >> 8) as u8, time as u8)
}

/// Reads a save header, leaving the reader positioned at the start of the
/// game-state payload whether or not the thumbnail is kept.
pub fn read_save_header<R: DataReader>(
    reader: &mut R,
    skip_thumbnail: bool,
) -> Result<SaveHeader, SaveHeaderError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic).map_err(|err| {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            SaveHeaderError::InvalidType
        } else {
            SaveHeaderError::Io(err)
        }
    })?;
    if &magic != SAVEGAME_MAGIC {
        return Err(SaveHeaderError::InvalidType);
    }

    let version = reader.read_u32_le()?;
    if version > SAVEGAME_VERSION {
        return Err(SaveHeaderError::InvalidVersion(version));
    }

    let game_id = reader.read_u8()?;
    let flags = reader.read_u32_le()?;
    let save_date = reader.read_u32_le()?;
    let save_time = reader.read_u32_le()?;
    let play_time = reader.read_u32_le()?;
    let description = reader.read_str_u16()?;

    let thumbnail = if skip_thumbnail {
        Thumbnail::skip(reader)?;
        None
    } else {
        Thumbnail::read(reader)?
    };

    Ok(SaveHeader {
        description,
        version,
        game_id,
        flags,
        save_date,
        save_time,
        play_time,
        thumbnail,
    })
}

pub fn write_save_header<W: DataWriter>(
    writer: &mut W,
    header: &SaveHeader,
) -> io::Result<()> {
    writer.write_all(SAVEGAME_MAGIC)?;
    writer.write_u32_le(header.version)?;
    writer.write_u8(header.game_id)?;
    writer.write_u32_le(header.flags)?;
    writer.write_u32_le(header.save_date)?;
    writer.write_u32_le(header.save_time)?;
    writer.write_u32_le(header.play_time)?;
    writer.write_str_u16(&header.description)?;
    Thumbnail::write_opt(writer, header.thumbnail.as_ref())
}
