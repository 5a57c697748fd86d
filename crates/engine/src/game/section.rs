use crate::game::{Game, globals::ids};

/// Per-section game logic.
///
/// Scenes group into numbered sections (scene 1xx is section 1, and so on);
/// each section has a handler that seeds its variables when the player
/// first enters and gets a step callback every frame while a scene of that
/// section is active.
pub trait SectionHandler {
    /// The section this handler serves.
    fn section(&self) -> u8;

    /// Called once when a scene transition crosses into this section.
    fn load_section(&mut self, game: &mut Game);

    /// Called every frame while this section is active.
    fn step(&mut self, game: &mut Game);
}

/// Builds the handler for `section`, or `None` for numbers no section logic
/// exists for.
#[must_use]
pub fn section_handler_for(section: u8) -> Option<Box<dyn SectionHandler>> {
    match section {
        1 => Some(Box::new(Section1Handler)),
        2 => Some(Box::new(Section2Handler)),
        3 => Some(Box::new(Section3Handler)),
        4 => Some(Box::new(Section4Handler)),
        5 => Some(Box::new(Section5Handler)),
        6 => Some(Box::new(Section6Handler { gust_countdown: 0 })),
        7 => Some(Box::new(Section7Handler)),
        8 => Some(Box::new(Section8Handler)),
        _ => None,
    }
}

/// Ranger station and forest edge.
struct Section1Handler;

impl SectionHandler for Section1Handler {
    fn section(&self) -> u8 {
        1
    }

    fn load_section(&mut self, game: &mut Game) {
        // The gate stays open once the ranger has been met.
        if game.globals()[ids::S1_RANGER_MET] != 0 {
            game.globals_mut()[ids::S1_GATE_OPEN] = 1;
        }
    }

    fn step(&mut self, _game: &mut Game) {}
}

/// River crossing.
struct Section2Handler;

impl SectionHandler for Section2Handler {
    fn section(&self) -> u8 {
        2
    }

    fn load_section(&mut self, game: &mut Game) {
        if game.globals()[ids::S2_RIVER_LEVEL] == 0 {
            game.globals_mut()[ids::S2_RIVER_LEVEL] = 2;
        }
    }

    fn step(&mut self, game: &mut Game) {
        // The river recedes while the raft is moored upstream.
        if game.globals()[ids::S2_RAFT_BUILT] != 0 && game.globals()[ids::S2_RIVER_LEVEL] > 1 {
            game.globals_mut()[ids::S2_RIVER_LEVEL] -= 1;
        }
    }
}

/// Deep woods.
struct Section3Handler;

impl SectionHandler for Section3Handler {
    fn section(&self) -> u8 {
        3
    }

    fn load_section(&mut self, game: &mut Game) {
        if game.globals()[ids::S3_OWL_RIDDLES_LEFT] == 0 {
            game.globals_mut()[ids::S3_OWL_RIDDLES_LEFT] = 3;
        }
    }

    fn step(&mut self, game: &mut Game) {
        // Dark scenes freeze the player until the lantern is lit.
        let dark = game.globals()[ids::S3_LANTERN_LIT] == 0;
        if let Some(scene) = game.scene().current() {
            if scene.number() >= 310 {
                game.player_mut().step_enabled = !dark;
            }
        }
    }
}

/// Village and trading post.
struct Section4Handler;

impl SectionHandler for Section4Handler {
    fn section(&self) -> u8 {
        4
    }

    fn load_section(&mut self, game: &mut Game) {
        if game.globals()[ids::S4_TRADER_MOOD] == 0 {
            game.globals_mut()[ids::S4_TRADER_MOOD] = 1;
        }
    }

    fn step(&mut self, _game: &mut Game) {}
}

/// Caves below the falls.
struct Section5Handler;

impl SectionHandler for Section5Handler {
    fn section(&self) -> u8 {
        5
    }

    fn load_section(&mut self, game: &mut Game) {
        game.globals_mut()[ids::S5_BAT_SCARED] = 0;
    }

    fn step(&mut self, _game: &mut Game) {}
}

/// Summit, with the storm bearing down.
struct Section6Handler {
    gust_countdown: i16,
}

impl SectionHandler for Section6Handler {
    fn section(&self) -> u8 {
        6
    }

    fn load_section(&mut self, game: &mut Game) {
        game.globals_mut()[ids::S6_STORM_TIMER] = 0;
        self.gust_countdown = 40;
    }

    fn step(&mut self, game: &mut Game) {
        self.gust_countdown -= 1;
        if self.gust_countdown <= 0 {
            self.gust_countdown = 40;
            let timer = game.globals()[ids::S6_STORM_TIMER].saturating_add(1);
            game.globals_mut()[ids::S6_STORM_TIMER] = timer;
        }
    }
}

/// Interludes and cutscene rooms.
struct Section7Handler;

impl SectionHandler for Section7Handler {
    fn section(&self) -> u8 {
        7
    }

    fn load_section(&mut self, game: &mut Game) {
        game.globals_mut()[ids::DIALOG_SUPPRESSED] = 1;
        game.player_mut().step_enabled = false;
    }

    fn step(&mut self, _game: &mut Game) {}
}

/// Finale.
struct Section8Handler;

impl SectionHandler for Section8Handler {
    fn section(&self) -> u8 {
        8
    }

    fn load_section(&mut self, game: &mut Game) {
        if game.globals()[ids::S9_ENDGAME_STAGE] == 0 {
            game.globals_mut()[ids::S9_ENDGAME_STAGE] = 1;
        }
    }

    fn step(&mut self, _game: &mut Game) {}
}
