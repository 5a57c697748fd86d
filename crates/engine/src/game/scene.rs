use std::io;

use fernwood_utils::{DataReader, DataWriter};

/// Scene the player starts a new game in.
pub const OPENING_SCENE: SceneId = SceneId(101);

/// Numeric id of one room. The hundreds digit is the section the room
/// belongs to, so section ids start at 1 and scene ids at 101.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneId(u16);

impl SceneId {
    #[must_use]
    pub fn new(number: u16) -> Self {
        SceneId(number)
    }

    #[must_use]
    pub fn number(self) -> u16 {
        self.0
    }

    /// Section this scene belongs to.
    #[must_use]
    pub fn section(self) -> u8 {
        (self.0 / 100) as u8
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The prior/current/next scene triplet.
///
/// `prior` and `current` are `None` until the game has actually visited a
/// scene, rather than the 0 / -1 sentinels of the original interpreters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneIds {
    prior: Option<SceneId>,
    current: Option<SceneId>,
    next: Option<SceneId>,
}

impl SceneIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the triplet at the opening scene for a fresh game.
    pub fn start(&mut self) {
        self.prior = None;
        self.current = None;
        self.next = Some(OPENING_SCENE);
    }

    #[must_use]
    pub fn prior(&self) -> Option<SceneId> {
        self.prior
    }

    #[must_use]
    pub fn current(&self) -> Option<SceneId> {
        self.current
    }

    #[must_use]
    pub fn next(&self) -> Option<SceneId> {
        self.next
    }

    /// Queues a scene change to be picked up by the main loop.
    pub fn request(&mut self, next: SceneId) {
        self.next = Some(next);
    }

    /// The queued scene change, if one is pending.
    #[must_use]
    pub fn pending(&self) -> Option<SceneId> {
        match (self.next, self.current) {
            (Some(next), Some(current)) if next == current => None,
            (next, _) => next,
        }
    }

    /// Commits the pending change: current becomes prior, next becomes
    /// current. Returns the scene entered.
    pub fn complete_transition(&mut self) -> Option<SceneId> {
        let next = self.pending()?;
        self.prior = self.current;
        self.current = Some(next);
        next.into()
    }

    pub fn synchronize_write<W: DataWriter>(&self, writer: &mut W) -> io::Result<()> {
        write_opt_scene(writer, self.prior)?;
        write_opt_scene(writer, self.current)?;
        write_opt_scene(writer, self.next)
    }

    pub fn synchronize_read<R: DataReader>(&mut self, reader: &mut R) -> io::Result<()> {
        self.prior = read_opt_scene(reader)?;
        self.current = read_opt_scene(reader)?;
        self.next = read_opt_scene(reader)?;
        Ok(())
    }
}

// Scene numbers start at 101, so 0 is free to mean "unset" on disk.
fn write_opt_scene<W: DataWriter>(writer: &mut W, scene: Option<SceneId>) -> io::Result<()> {
    writer.write_u16_le(scene.map_or(0, SceneId::number))
}

fn read_opt_scene<R: DataReader>(reader: &mut R) -> io::Result<Option<SceneId>> {
    let number = reader.read_u16_le()?;
    Ok((number != 0).then(|| SceneId::new(number)))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use fernwood_utils::{IoDataReader, IoDataWriter};

    use super::*;

    #[test]
    fn scene_section_is_hundreds_digit() {
        assert_eq!(SceneId::new(101).section(), 1);
        assert_eq!(SceneId::new(299).section(), 2);
        assert_eq!(SceneId::new(805).section(), 8);
    }

    #[test]
    fn start_points_at_opening_scene() {
        let mut scene = SceneIds::new();
        scene.start();
        assert_eq!(scene.prior(), None);
        assert_eq!(scene.current(), None);
        assert_eq!(scene.pending(), Some(OPENING_SCENE));
    }

    #[test]
    fn transition_shifts_the_triplet() {
        let mut scene = SceneIds::new();
        scene.start();
        assert_eq!(scene.complete_transition(), Some(OPENING_SCENE));
        assert_eq!(scene.current(), Some(OPENING_SCENE));
        assert_eq!(scene.pending(), None);

        scene.request(SceneId::new(104));
        assert_eq!(scene.complete_transition(), Some(SceneId::new(104)));
        assert_eq!(scene.prior(), Some(OPENING_SCENE));
        assert_eq!(scene.current(), Some(SceneId::new(104)));
        assert_eq!(scene.complete_transition(), None);
    }

    #[test]
    fn synchronize_round_trip() {
        let mut scene = SceneIds::new();
        scene.start();
        scene.complete_transition();
        scene.request(SceneId::new(212));

        let mut writer = IoDataWriter::new(Cursor::new(Vec::new()));
        scene.synchronize_write(&mut writer).unwrap();
        let mut restored = SceneIds::new();
        let mut reader = IoDataReader::new(Cursor::new(writer.into_inner().into_inner()));
        restored.synchronize_read(&mut reader).unwrap();
        assert_eq!(restored, scene);
    }
}
