use std::path::PathBuf;

use clap::Parser;
use fernwood_engine::{Engine, EngineConfig};

#[derive(Parser)]
#[command(about = "Boot the engine from a config file and run the main loop.")]
pub(super) struct Run {
    #[clap(index = 1)]
    config: PathBuf,
    /// How many ticks to run before exiting.
    #[clap(long, default_value_t = 600)]
    ticks: u64,
}

impl Run {
    pub(super) fn run(&self) -> anyhow::Result<()> {
        let config = EngineConfig::from_file(&self.config)?;
        let mut engine = Engine::new(config)?;
        engine.start_game();

        for _ in 0..self.ticks {
            let report = engine.tick();
            if let Some(scene) = report.entered_scene {
                println!("entered scene {scene}");
            }
            if let Some(feedback) = report.feedback {
                println!("{feedback}");
            }
            if let Some(dialog) = report.dialog {
                log::info!("dialog requested: {dialog:?}");
            }
        }

        println!(
            "stopped after {} ticks in scene {}",
            self.ticks,
            engine.game_state().scene_num
        );
        Ok(())
    }
}
