use std::{
    io::{Read, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use fernwood_engine::archive::{Archive, BundleArchive, BundleBuilder, DirArchive};
use itertools::Itertools;

use super::args::OutFilePath;

#[derive(Parser)]
#[command(about = "List the members of a data bundle.")]
struct List {
    #[clap(index = 1)]
    bundle: PathBuf,
}

impl List {
    fn run(&self) -> anyhow::Result<()> {
        let bundle = BundleArchive::open(&self.bundle)?;
        println!(
            "bundle v{}.{}",
            bundle.major_version(),
            bundle.minor_version()
        );
        let mut members = Vec::new();
        bundle.list_members(&mut members);
        for member in members.iter().sorted_by_key(|m| m.name().to_owned()) {
            println!("{:>10}  {}", member.size(), member.name());
        }
        Ok(())
    }
}

#[derive(Parser)]
#[command(about = "Extract one member of a data bundle.")]
struct Extract {
    #[clap(index = 1)]
    bundle: PathBuf,
    #[clap(index = 2)]
    member: String,
    /// Output file, or `-` for stdout.
    #[clap(short = 'o', long, default_value = "-")]
    output: OutFilePath,
}

impl Extract {
    fn run(&self) -> anyhow::Result<()> {
        let bundle = BundleArchive::open(&self.bundle)?;
        let mut stream = bundle
            .open_member(&self.member)
            .with_context(|| format!("no member {:?} in bundle", self.member))?;
        let mut contents = Vec::new();
        stream.read_to_end(&mut contents)?;
        let mut output = self.output.open()?;
        output.write_all(&contents)?;
        Ok(())
    }
}

#[derive(Parser)]
#[command(about = "Pack a directory of loose files into a data bundle.")]
struct Pack {
    #[clap(index = 1)]
    dir: PathBuf,
    #[clap(short = 'o', long)]
    output: PathBuf,
    #[clap(long, default_value_t = 1)]
    major: u16,
    #[clap(long, default_value_t = 0)]
    minor: u16,
}

impl Pack {
    fn run(&self) -> anyhow::Result<()> {
        let dir = DirArchive::new(&self.dir);
        let mut members = Vec::new();
        dir.list_members(&mut members);

        let mut builder = BundleBuilder::new(self.major, self.minor);
        for member in members.iter().sorted_by_key(|m| m.name().to_owned()) {
            let mut stream = dir
                .open_member(member.name())
                .with_context(|| format!("failed to open {:?}", member.name()))?;
            let mut contents = Vec::new();
            stream.read_to_end(&mut contents)?;
            builder.add_file(member.name(), contents);
        }

        let out = std::fs::File::create(&self.output)?;
        builder.write_to(std::io::BufWriter::new(out))?;
        println!("packed {} files into {}", members.len(), self.output.display());
        Ok(())
    }
}

#[derive(Subcommand)]
enum DataCommand {
    List(List),
    Extract(Extract),
    Pack(Pack),
}

#[derive(Parser)]
pub(super) struct Data {
    #[clap(subcommand)]
    command: DataCommand,
}

impl Data {
    pub(super) fn run(&self) -> anyhow::Result<()> {
        match &self.command {
            DataCommand::List(list) => list.run(),
            DataCommand::Extract(extract) => extract.run(),
            DataCommand::Pack(pack) => pack.run(),
        }
    }
}
