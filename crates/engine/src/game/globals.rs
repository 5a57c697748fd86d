use std::{
    io,
    ops::{Index, IndexMut},
};

use fernwood_utils::{DataReader, DataWriter};

/// Size of the game's global register bank.
pub const GLOBALS_COUNT: usize = 256;

/// Well-known global indices.
///
/// The bank is addressed by number in the original room scripts; the
/// constants here cover the variables the engine itself touches. Indices
/// group by section: 1x ranger station, 2x river, 3x deep woods, 4x
/// village, 5x caves, 6x summit, 9x finale.
pub mod ids {
    /// How many "it can't talk" quips remain before the response repeats.
    pub const TALK_INANIMATE_COUNT: usize = 4;
    /// Non-zero while cutscene logic suppresses queued dialogs.
    pub const DIALOG_SUPPRESSED: usize = 5;
    /// Frames the player has stood idle; drives fidget animations.
    pub const IDLE_TICKS: usize = 6;

    pub const S1_RANGER_MET: usize = 10;
    pub const S1_GATE_OPEN: usize = 11;
    pub const S2_RAFT_BUILT: usize = 20;
    pub const S2_RIVER_LEVEL: usize = 21;
    pub const S3_OWL_RIDDLES_LEFT: usize = 30;
    pub const S3_LANTERN_LIT: usize = 31;
    pub const S4_COINS: usize = 40;
    pub const S4_TRADER_MOOD: usize = 41;
    pub const S5_ROPE_ANCHORED: usize = 50;
    pub const S5_BAT_SCARED: usize = 51;
    pub const S6_STORM_TIMER: usize = 60;
    pub const S9_ENDGAME_STAGE: usize = 90;
}

/// The game's global variable bank, zeroed at the start of every game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Globals {
    values: Vec<i16>,
}

impl Default for Globals {
    fn default() -> Self {
        Globals {
            values: vec![0; GLOBALS_COUNT],
        }
    }
}

impl Globals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes every register.
    pub fn reset(&mut self) {
        self.values.fill(0);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn synchronize_write<W: DataWriter>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u16_le(self.values.len() as u16)?;
        for &value in &self.values {
            writer.write_i16_le(value)?;
        }
        Ok(())
    }

    /// Reads a serialized bank. Saves written with a smaller bank leave the
    /// tail registers zeroed.
    pub fn synchronize_read<R: DataReader>(&mut self, reader: &mut R) -> io::Result<()> {
        let count = usize::from(reader.read_u16_le()?);
        if count > GLOBALS_COUNT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("save has {count} globals, engine supports {GLOBALS_COUNT}"),
            ));
        }
        self.reset();
        for slot in &mut self.values[..count] {
            *slot = reader.read_i16_le()?;
        }
        Ok(())
    }
}

impl Index<usize> for Globals {
    type Output = i16;

    fn index(&self, index: usize) -> &i16 {
        &self.values[index]
    }
}

impl IndexMut<usize> for Globals {
    fn index_mut(&mut self, index: usize) -> &mut i16 {
        &mut self.values[index]
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use fernwood_utils::{IoDataReader, IoDataWriter};

    use super::*;

    #[test]
    fn reset_zeroes_everything() {
        let mut globals = Globals::new();
        globals[ids::S4_COINS] = 12;
        globals[ids::S6_STORM_TIMER] = -3;
        globals.reset();
        assert!((0..GLOBALS_COUNT).all(|i| globals[i] == 0));
    }

    #[test]
    fn synchronize_preserves_values() {
        let mut globals = Globals::new();
        globals[ids::S3_OWL_RIDDLES_LEFT] = 3;
        globals[ids::S2_RIVER_LEVEL] = -2;

        let mut writer = IoDataWriter::new(Cursor::new(Vec::new()));
        globals.synchronize_write(&mut writer).unwrap();

        let mut read_back = Globals::new();
        read_back[ids::S4_COINS] = 99; // must be overwritten by the load
        let mut reader = IoDataReader::new(Cursor::new(writer.into_inner().into_inner()));
        read_back.synchronize_read(&mut reader).unwrap();
        assert_eq!(read_back, globals);
    }

    #[test]
    fn oversized_bank_is_rejected() {
        let mut writer = IoDataWriter::new(Cursor::new(Vec::new()));
        writer.write_u16_le((GLOBALS_COUNT + 1) as u16).unwrap();
        let mut reader = IoDataReader::new(Cursor::new(writer.into_inner().into_inner()));
        assert!(Globals::new().synchronize_read(&mut reader).is_err());
    }
}
