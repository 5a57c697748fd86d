use std::{fs::File, io::BufReader, path::PathBuf};

use clap::{Parser, Subcommand};
use fernwood_engine::savegame::{
    list_savegames, read_save_header, remove_savegame, unpack_date, unpack_time,
};
use fernwood_utils::IoDataReader;

#[derive(Parser)]
#[command(about = "Print the header of a save file.")]
struct Info {
    #[clap(index = 1)]
    file: PathBuf,
}

impl Info {
    fn run(&self) -> anyhow::Result<()> {
        let mut reader = IoDataReader::new(BufReader::new(File::open(&self.file)?));
        let header = read_save_header(&mut reader, false)?;

        let (year, month, day) = unpack_date(header.save_date);
        let (hour, minute) = unpack_time(header.save_time);
        println!("description: {}", header.description);
        println!("version:     {}", header.version);
        println!("game id:     {}", header.game_id);
        println!("flags:       {:#x}", header.flags);
        println!("saved:       {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}");
        println!(
            "play time:   {}:{:02}:{:02}",
            header.play_time / 3600,
            (header.play_time / 60) % 60,
            header.play_time % 60
        );
        match &header.thumbnail {
            Some(thumb) => println!("thumbnail:   {}x{}", thumb.width(), thumb.height()),
            None => println!("thumbnail:   none"),
        }
        Ok(())
    }
}

#[derive(Parser)]
#[command(about = "List the save slots in a directory.")]
struct List {
    #[clap(index = 1)]
    dir: PathBuf,
    #[clap(short = 't', long, default_value = "fernwood")]
    target: String,
}

impl List {
    fn run(&self) -> anyhow::Result<()> {
        let slots = list_savegames(&self.dir, &self.target)?;
        if slots.is_empty() {
            println!("no saves for {:?} in {}", self.target, self.dir.display());
            return Ok(());
        }
        for slot in slots {
            println!("{:03}  {}", slot.slot, slot.description);
        }
        Ok(())
    }
}

#[derive(Parser)]
#[command(about = "Delete one save slot.")]
struct Remove {
    #[clap(index = 1)]
    dir: PathBuf,
    #[clap(index = 2)]
    slot: u16,
    #[clap(short = 't', long, default_value = "fernwood")]
    target: String,
}

impl Remove {
    fn run(&self) -> anyhow::Result<()> {
        remove_savegame(&self.dir, &self.target, self.slot)?;
        Ok(())
    }
}

#[derive(Subcommand)]
enum SaveCommand {
    Info(Info),
    List(List),
    Remove(Remove),
}

#[derive(Parser)]
pub(super) struct Save {
    #[clap(subcommand)]
    command: SaveCommand,
}

impl Save {
    pub(super) fn run(&self) -> anyhow::Result<()> {
        match &self.command {
            SaveCommand::Info(info) => info.run(),
            SaveCommand::List(list) => list.run(),
            SaveCommand::Remove(remove) => remove.run(),
        }
    }
}
