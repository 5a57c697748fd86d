use std::io;

use fernwood_utils::{DataReader, DataWriter};

/// Eight-way facing of the player sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl Facing {
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            Facing::North => 0,
            Facing::Northeast => 1,
            Facing::East => 2,
            Facing::Southeast => 3,
            Facing::South => 4,
            Facing::Southwest => 5,
            Facing::West => 6,
            Facing::Northwest => 7,
        }
    }

    pub fn from_u8(value: u8) -> io::Result<Self> {
        Ok(match value {
            0 => Facing::North,
            1 => Facing::Northeast,
            2 => Facing::East,
            3 => Facing::Southeast,
            4 => Facing::South,
            5 => Facing::Southwest,
            6 => Facing::West,
            7 => Facing::Northwest,
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid facing value {other}"),
                ));
            }
        })
    }
}

/// Player actor state the game logic cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub facing: Facing,
    /// Direction the player is turning towards; equals `facing` once the
    /// turn animation has finished.
    pub turn_to_facing: Facing,
    pub visible: bool,
    pub step_enabled: bool,
    pub moving: bool,
    pub sprites_loaded: bool,
}

impl Default for Player {
    fn default() -> Self {
        Player {
            facing: Facing::North,
            turn_to_facing: Facing::North,
            visible: true,
            step_enabled: true,
            moving: false,
            sprites_loaded: false,
        }
    }
}

impl Player {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the turn animation has caught up with the requested facing.
    #[must_use]
    pub fn is_done_turning(&self) -> bool {
        self.facing == self.turn_to_facing
    }

    /// True while the player can be stepped by the main loop at all.
    #[must_use]
    pub fn can_step(&self) -> bool {
        self.visible && self.step_enabled && !self.moving && self.is_done_turning()
    }

    /// Drops the walk sprites, done before a full-screen dialog takes over.
    pub fn release_sprites(&mut self) {
        self.sprites_loaded = false;
        self.moving = false;
    }

    pub fn synchronize_write<W: DataWriter>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self.facing.to_u8())?;
        writer.write_u8(self.turn_to_facing.to_u8())?;
        let flags = u8::from(self.visible)
            | (u8::from(self.step_enabled) << 1)
            | (u8::from(self.moving) << 2);
        writer.write_u8(flags)
    }

    pub fn synchronize_read<R: DataReader>(&mut self, reader: &mut R) -> io::Result<()> {
        self.facing = Facing::from_u8(reader.read_u8()?)?;
        self.turn_to_facing = Facing::from_u8(reader.read_u8()?)?;
        let flags = reader.read_u8()?;
        self.visible = flags & 1 != 0;
        self.step_enabled = flags & 2 != 0;
        self.moving = flags & 4 != 0;
        // Sprites are always reloaded by the scene after a restore.
        self.sprites_loaded = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use fernwood_utils::{IoDataReader, IoDataWriter};

    use super::*;

    #[test]
    fn facing_byte_round_trip() {
        for value in 0..8 {
            assert_eq!(Facing::from_u8(value).unwrap().to_u8(), value);
        }
        assert!(Facing::from_u8(8).is_err());
    }

    #[test]
    fn can_step_requires_finished_turn() {
        let mut player = Player::new();
        assert!(player.can_step());
        player.turn_to_facing = Facing::West;
        assert!(!player.can_step());
        player.facing = Facing::West;
        assert!(player.can_step());
        player.moving = true;
        assert!(!player.can_step());
    }

    #[test]
    fn synchronize_round_trip() {
        let mut player = Player::new();
        player.facing = Facing::Southwest;
        player.turn_to_facing = Facing::South;
        player.step_enabled = false;
        player.sprites_loaded = true;

        let mut writer = IoDataWriter::new(Cursor::new(Vec::new()));
        player.synchronize_write(&mut writer).unwrap();
        let mut restored = Player::new();
        let mut reader = IoDataReader::new(Cursor::new(writer.into_inner().into_inner()));
        restored.synchronize_read(&mut reader).unwrap();

        assert_eq!(restored.facing, Facing::Southwest);
        assert_eq!(restored.turn_to_facing, Facing::South);
        assert!(!restored.step_enabled);
        assert!(restored.visible);
        // Never persisted.
        assert!(!restored.sprites_loaded);
    }
}
