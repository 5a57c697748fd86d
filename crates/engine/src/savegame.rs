//! The Fernwood savegame format.
//!
//! A save file is a fixed header (everything the load/save UI needs to show
//! a slot without understanding the game: description, timestamps, play
//! time, thumbnail) followed by the serialized game state. The header codec
//! lives in [`header`], the slot-file naming and directory scanning in
//! [`slots`].

mod header;
mod slots;
mod thumbnail;

pub use header::{
    GAME_ID, SAVE_FLAG_AUTOSAVE, SAVEGAME_MAGIC, SAVEGAME_VERSION, SaveHeader,
    SaveHeaderError, pack_date, pack_time, read_save_header, unpack_date, unpack_time,
    write_save_header,
};
pub use slots::{SaveSlotInfo, list_savegames, remove_savegame, savegame_filename};
pub use thumbnail::Thumbnail;
