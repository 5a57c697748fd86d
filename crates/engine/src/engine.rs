//! The engine shell: mounts the data archive, owns the game state, and
//! exposes the event-loop and save/load surface a front end drives.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read},
    path::{Path, PathBuf},
};

use chrono::{Datelike, Timelike};
use fernwood_utils::{DataReader, DataWriter, IoDataReader, IoDataWriter};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    archive::{Archive, DataArchive, DataArchiveError},
    config::EngineConfig,
    game::{Dialog, Game, SceneId, globals::ids},
    savegame::{
        self, GAME_ID, SAVE_FLAG_AUTOSAVE, SAVEGAME_VERSION, SaveHeader, SaveHeaderError,
        SaveSlotInfo, Thumbnail,
    },
};

/// Data bundle version this engine understands.
pub const DATA_VERSION_MAJOR: u16 = 1;
pub const DATA_VERSION_MINOR: u16 = 0;

/// Folder inside the shared bundle holding this game's assets.
pub const DATA_SUBFOLDER: &str = "forest";

/// Nominal main-loop rate; play time is derived from the tick count.
pub const TICKS_PER_SECOND: u32 = 60;

const SUBFONT_MEMBER: &str = "data/subfont.bin";
const SUBFONT_GLYPHS: usize = 256;

const AMBIENT_LINES: &[&str] = &[
    "Wind stirs the canopy overhead.",
    "Somewhere upslope, a woodpecker sets to work.",
    "Leaves whisper along the trail.",
];

// Roughly five seconds of standing still.
const IDLE_AMBIENT_THRESHOLD: i16 = 300;

/// One glyph of the subtitle font: 8x16 1-bpp bitmap plus its outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtitleGlyph {
    pub bitmap: [u8; 16],
    pub outline: [u8; 16],
}

/// Mirror of the coarse engine-side state shown in debugging overlays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameState {
    pub scene_num: u16,
    pub which: u16,
}

/// What happened during one tick, for the front end to react to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub entered_scene: Option<SceneId>,
    pub dialog: Option<Dialog>,
    pub feedback: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Archive(#[from] DataArchiveError),
    #[error(transparent)]
    SaveHeader(#[from] SaveHeaderError),
    #[error("save file belongs to another game (id {found})")]
    WrongGame { found: u8 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct Engine {
    config: EngineConfig,
    archive: DataArchive,
    game: Game,
    game_state: GameState,
    rng: StdRng,
    subfont: Option<Vec<SubtitleGlyph>>,
    mouse_x: i16,
    mouse_y: i16,
    button_state: u16,
    is_save_allowed: bool,
    update_sound: bool,
    enable_music: bool,
    ticks: u64,
}

impl Engine {
    /// Mounts the game data described by `config` and prepares a fresh
    /// (not yet started) game.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let archive = DataArchive::load(
            &config.bundle_path,
            DATA_SUBFOLDER,
            DATA_VERSION_MAJOR,
            DATA_VERSION_MINOR,
            config.extra_path.as_deref(),
        )?;
        let subfont = load_subfont(&archive);
        if subfont.is_some() {
            log::debug!("subtitle font loaded");
        }

        Ok(Engine {
            update_sound: config.update_sound,
            enable_music: config.enable_music,
            config,
            archive,
            game: Game::new(),
            game_state: GameState::default(),
            rng: StdRng::from_os_rng(),
            subfont,
            mouse_x: 0,
            mouse_y: 0,
            button_state: 0,
            is_save_allowed: true,
            ticks: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn archive(&self) -> &dyn Archive {
        &self.archive
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    #[must_use]
    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    /// Starts a new game at the opening scene.
    pub fn start_game(&mut self) {
        log::info!("starting new game");
        self.game.start_game();
        self.game.set_section_handler();
        self.ticks = 0;
    }

    /// Runs one frame of the main loop: commits a pending scene change,
    /// steps the game logic, and surfaces any dialog or feedback.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        if let Some(next) = self.game.scene().pending() {
            let crossing_section =
                self.game.scene().current().map(SceneId::section) != Some(next.section());
            self.game.scene_mut().complete_transition();
            self.game_state.scene_num = next.number();
            if crossing_section {
                self.game.set_section_handler();
                self.game.load_section();
            }
            log::info!("entering scene {next}");
            report.entered_scene = Some(next);
        }

        self.game.step();

        if self.game.globals()[ids::IDLE_TICKS] >= IDLE_AMBIENT_THRESHOLD {
            self.game.globals_mut()[ids::IDLE_TICKS] = 0;
            let line = AMBIENT_LINES[self.rng.random_range(0..AMBIENT_LINES.len())];
            report.feedback = Some(line.to_owned());
        }

        report.dialog = self.game.check_show_dialog();
        if report.feedback.is_none() {
            report.feedback = self.game.take_feedback();
        }
        self.ticks += 1;
        report
    }

    #[must_use]
    pub fn play_time_secs(&self) -> u32 {
        (self.ticks / u64::from(TICKS_PER_SECOND)) as u32
    }

    /* Save/load */

    #[must_use]
    pub fn can_save(&self) -> bool {
        self.is_save_allowed
    }

    #[must_use]
    pub fn can_load(&self) -> bool {
        self.is_save_allowed
    }

    /// Scene logic forbids saving during cutscenes and deaths.
    pub fn set_save_allowed(&mut self, allowed: bool) {
        self.is_save_allowed = allowed;
    }

    /// Filename (without directory) for a numbered save slot.
    #[must_use]
    pub fn save_state_name(&self, slot: u16) -> String {
        savegame::savegame_filename(&self.config.target_name, slot)
    }

    fn slot_path(&self, slot: u16) -> PathBuf {
        self.config.save_dir.join(self.save_state_name(slot))
    }

    pub fn save_game_state(
        &mut self,
        slot: u16,
        description: &str,
        is_autosave: bool,
    ) -> Result<(), EngineError> {
        let path = self.slot_path(slot);
        self.savegame(&path, description, is_autosave)
    }

    pub fn load_game_state(&mut self, slot: u16) -> Result<(), EngineError> {
        let path = self.slot_path(slot);
        self.loadgame(&path)
    }

    pub fn remove_game_state(&mut self, slot: u16) -> Result<(), EngineError> {
        savegame::remove_savegame(&self.config.save_dir, &self.config.target_name, slot)?;
        Ok(())
    }

    pub fn list_saves(&self) -> Result<Vec<SaveSlotInfo>, EngineError> {
        Ok(savegame::list_savegames(
            &self.config.save_dir,
            &self.config.target_name,
        )?)
    }

    /// Writes the full game state to `path`.
    pub fn savegame(
        &mut self,
        path: &Path,
        description: &str,
        is_autosave: bool,
    ) -> Result<(), EngineError> {
        let now = chrono::Local::now();
        let header = SaveHeader {
            description: description.to_owned(),
            version: SAVEGAME_VERSION,
            game_id: GAME_ID,
            flags: if is_autosave { SAVE_FLAG_AUTOSAVE } else { 0 },
            save_date: savegame::pack_date(
                now.year().clamp(0, i32::from(u16::MAX)) as u16,
                now.month() as u8,
                now.day() as u8,
            ),
            save_time: savegame::pack_time(now.hour() as u8, now.minute() as u8),
            play_time: self.play_time_secs(),
            thumbnail: self.capture_thumbnail(),
        };

        let mut writer = IoDataWriter::new(BufWriter::new(File::create(path)?));
        savegame::write_save_header(&mut writer, &header)?;
        writer.write_u16_le(self.game_state.which)?;
        self.game.synchronize_write(&mut writer, true)?;
        self.game.synchronize_write(&mut writer, false)?;
        log::info!("saved game to {}", path.display());
        Ok(())
    }

    /// Restores the full game state from `path`.
    pub fn loadgame(&mut self, path: &Path) -> Result<(), EngineError> {
        let mut reader = IoDataReader::new(BufReader::new(File::open(path)?));
        let header = savegame::read_save_header(&mut reader, true)?;
        if header.game_id != GAME_ID {
            return Err(EngineError::WrongGame {
                found: header.game_id,
            });
        }

        self.game_state.which = reader.read_u16_le()?;
        self.game.synchronize_read(&mut reader, true)?;
        self.game.synchronize_read(&mut reader, false)?;
        if let Some(current) = self.game.scene().current() {
            self.game_state.scene_num = current.number();
        }
        self.ticks = u64::from(header.play_time) * u64::from(TICKS_PER_SECOND);
        log::info!(
            "restored {:?} from {}",
            header.description,
            path.display()
        );
        Ok(())
    }

    // No renderer in this crate; front ends that have one substitute a real
    // screenshot before saving.
    fn capture_thumbnail(&self) -> Option<Thumbnail> {
        None
    }

    /* Event-loop state */

    pub fn set_mouse_pos(&mut self, x: i16, y: i16) {
        self.mouse_x = x;
        self.mouse_y = y;
    }

    #[must_use]
    pub fn mouse_pos(&self) -> (i16, i16) {
        (self.mouse_x, self.mouse_y)
    }

    pub fn set_button_state(&mut self, state: u16) {
        self.button_state = state;
    }

    #[must_use]
    pub fn button_state(&self) -> u16 {
        self.button_state
    }

    /* Sound toggles */

    pub fn toggle_sound_update(&mut self, state: bool) {
        self.update_sound = state;
    }

    #[must_use]
    pub fn sound_update_enabled(&self) -> bool {
        self.update_sound
    }

    pub fn toggle_music(&mut self, state: bool) {
        self.enable_music = state;
    }

    #[must_use]
    pub fn music_is_enabled(&self) -> bool {
        self.enable_music
    }

    #[must_use]
    pub fn subfont(&self) -> Option<&[SubtitleGlyph]> {
        self.subfont.as_deref()
    }
}

fn load_subfont(archive: &DataArchive) -> Option<Vec<SubtitleGlyph>> {
    let mut stream = archive.open_member(SUBFONT_MEMBER)?;
    let mut data = Vec::new();
    if let Err(err) = stream.read_to_end(&mut data) {
        log::warn!("failed to read {SUBFONT_MEMBER}: {err}");
        return None;
    }
    if data.len() != SUBFONT_GLYPHS * 32 {
        log::warn!(
            "{SUBFONT_MEMBER} is {} bytes, expected {}",
            data.len(),
            SUBFONT_GLYPHS * 32
        );
        return None;
    }

    let glyphs = data
        .chunks_exact(32)
        .map(|chunk| {
            let mut glyph = SubtitleGlyph {
                bitmap: [0; 16],
                outline: [0; 16],
            };
            glyph.bitmap.copy_from_slice(&chunk[..16]);
            glyph.outline.copy_from_slice(&chunk[16..]);
            glyph
        })
        .collect();
    Some(glyphs)
}

#[cfg(test)]
mod tests {
    use crate::archive::BundleBuilder;
    use crate::game::OPENING_SCENE;

    use super::*;

    fn test_engine(dir: &Path, subfont: bool) -> Engine {
        let mut builder = BundleBuilder::new(DATA_VERSION_MAJOR, DATA_VERSION_MINOR);
        builder.add_file("forest/rooms/101.bin", vec![0; 4]);
        if subfont {
            builder.add_file("forest/subfont.bin", vec![0xAB; SUBFONT_GLYPHS * 32]);
        }
        let bundle_path = dir.join("fernwood.dat");
        std::fs::write(&bundle_path, builder.build().unwrap()).unwrap();

        let config = EngineConfig {
            bundle_path,
            save_dir: dir.to_path_buf(),
            ..EngineConfig::default()
        };
        Engine::new(config).unwrap()
    }

    #[test]
    fn first_tick_enters_opening_scene() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = test_engine(dir.path(), false);
        engine.start_game();

        let report = engine.tick();
        assert_eq!(report.entered_scene, Some(OPENING_SCENE));
        assert_eq!(engine.game_state().scene_num, 101);
        assert_eq!(engine.game().section_number(), Some(1));

        // No pending change: the next tick stays put.
        assert_eq!(engine.tick().entered_scene, None);
    }

    #[test]
    fn subfont_loads_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(dir.path(), true);
        let glyphs = engine.subfont().unwrap();
        assert_eq!(glyphs.len(), SUBFONT_GLYPHS);
        assert_eq!(glyphs[0].bitmap, [0xAB; 16]);

        let bare = test_engine(tempfile::tempdir().unwrap().path(), false);
        assert!(bare.subfont().is_none());
    }

    #[test]
    fn slot_save_restores_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = test_engine(dir.path(), false);
        engine.start_game();
        engine.tick();
        engine.game_mut().globals_mut()[ids::S4_COINS] = 23;
        engine.game_mut().scene_mut().request(SceneId::new(404));
        engine.save_game_state(1, "at the trading post", false).unwrap();

        // Wreck the live state, then restore.
        engine.start_game();
        engine.tick();
        assert_eq!(engine.game().globals()[ids::S4_COINS], 0);

        engine.load_game_state(1).unwrap();
        assert_eq!(engine.game().globals()[ids::S4_COINS], 23);
        assert_eq!(engine.game().scene().pending(), Some(SceneId::new(404)));
        assert_eq!(engine.game_state().scene_num, 101);

        let saves = engine.list_saves().unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].description, "at the trading post");

        engine.remove_game_state(1).unwrap();
        assert!(engine.list_saves().unwrap().is_empty());
    }

    #[test]
    fn save_state_name_uses_target() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(dir.path(), false);
        assert_eq!(engine.save_state_name(2), "fernwood.002");
    }

    #[test]
    fn toggles_and_event_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = test_engine(dir.path(), false);
        assert!(engine.music_is_enabled());
        engine.toggle_music(false);
        assert!(!engine.music_is_enabled());
        engine.toggle_sound_update(false);
        assert!(!engine.sound_update_enabled());

        engine.set_mouse_pos(12, -3);
        engine.set_button_state(1);
        assert_eq!(engine.mouse_pos(), (12, -3));
        assert_eq!(engine.button_state(), 1);

        assert!(engine.can_save());
        engine.set_save_allowed(false);
        assert!(!engine.can_save() && !engine.can_load());
    }
}
