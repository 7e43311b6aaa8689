//! Command-line front end: builds USD scenes from reaction records.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chemsim::error::ChemSimError;
use chemsim::layout::{layout_structure, Placement};
use chemsim::model::ReactionRecord;
use chemsim::options::Options;
use chemsim::scene::{
    record_directory, write_reaction, ReactionScene, UsdaWriter,
};
use chemsim::service::{
    reaction_id, FileReactionCache, OfflineService, ReactionClient,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "chemsim",
    about = "Lay out reaction records and write USD scenes"
)]
struct Cli {
    /// TOML options preset. Missing fields use defaults.
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build USD layers (and the animation stage) from a reaction record.
    Build {
        /// Reaction record JSON file.
        record: PathBuf,
        /// Output root; a subdirectory named after the record is created.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Skip the reactant-to-product animation stage.
        #[arg(long)]
        no_animation: bool,
    },
    /// Build a scene for a prompt whose record is already cached.
    Fetch {
        /// Reaction prompt.
        prompt: String,
        /// Cache directory holding `<id>.json` records.
        #[arg(long)]
        cache: PathBuf,
        /// Output root; a subdirectory named after the reaction id is
        /// created.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the cache key of a prompt.
    Id {
        /// Reaction prompt.
        prompt: String,
    },
    /// Print lattice positions of every molecule in a record as JSON.
    Layout {
        /// Reaction record JSON file.
        record: PathBuf,
    },
    /// Print the JSON Schema of the options file.
    Schema,
    /// Write the effective options (defaults merged with `--options`) as a
    /// TOML preset.
    Defaults {
        /// Destination file; parent directories are created.
        path: PathBuf,
    },
    /// List option presets (TOML files) in a directory.
    Presets {
        /// Directory to scan.
        dir: PathBuf,
    },
}

fn load_options(path: Option<&Path>) -> Result<Options, ChemSimError> {
    match path {
        Some(p) => {
            log::info!("loading options from {}", p.display());
            Options::load(p)
        }
        None => Ok(Options::default()),
    }
}

fn read_record(
    path: &Path,
    options: &Options,
) -> Result<ReactionRecord, ChemSimError> {
    let json = std::fs::read_to_string(path)?;
    Ok(ReactionRecord::from_json(&json, &options.colors)?)
}

fn build_and_write(
    record: &ReactionRecord,
    options: &Options,
    dir: &Path,
    with_animation: bool,
) -> Result<(), ChemSimError> {
    let scene = ReactionScene::build(record, options)?;
    let written = write_reaction(&scene, &UsdaWriter, dir, with_animation)?;

    let mut out = io::stdout().lock();
    for path in &written.molecules {
        writeln!(out, "{}", path.display())?;
    }
    if let Some(path) = &written.animation {
        writeln!(out, "{}", path.display())?;
    }
    Ok(())
}

fn print_layout(
    record: &ReactionRecord,
    options: &Options,
) -> Result<(), ChemSimError> {
    let mut molecules = Vec::new();
    for (role, mol) in record.molecules() {
        let layout = layout_structure(mol, options.layout.bond_length)
            .map_err(|e| ChemSimError::from(e).in_molecule(&mol.name))?;
        let atoms: Vec<_> = layout
            .iter()
            .map(|(id, pos, placement)| {
                serde_json::json!({
                    "id": id.as_str(),
                    "position": pos.to_array(),
                    "placement": match placement {
                        Placement::Traversal => "traversal",
                        Placement::Fallback => "fallback",
                    },
                })
            })
            .collect();
        molecules.push(serde_json::json!({
            "role": role.label(),
            "name": mol.name,
            "atoms": atoms,
        }));
    }

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &molecules)?;
    writeln!(out)?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), ChemSimError> {
    let options = load_options(cli.options.as_deref())?;

    match cli.command {
        Command::Build {
            record,
            out,
            no_animation,
        } => {
            let parsed = read_record(&record, &options)?;
            let root =
                out.unwrap_or_else(|| options.output.directory.clone());
            let dir = record_directory(&root, &record);
            let animate = options.output.write_animation && !no_animation;
            build_and_write(&parsed, &options, &dir, animate)
        }
        Command::Fetch { prompt, cache, out } => {
            let client = ReactionClient::new(
                OfflineService,
                FileReactionCache::new(cache),
                options.colors.clone(),
            )
            .offline();
            let fetched = client.fetch(&prompt)?;
            let root =
                out.unwrap_or_else(|| options.output.directory.clone());
            let dir = root.join(&fetched.reaction_id);
            build_and_write(
                &fetched.record,
                &options,
                &dir,
                options.output.write_animation,
            )
        }
        Command::Id { prompt } => {
            writeln!(io::stdout().lock(), "{}", reaction_id(prompt.trim()))?;
            Ok(())
        }
        Command::Layout { record } => {
            let parsed = read_record(&record, &options)?;
            print_layout(&parsed, &options)
        }
        Command::Schema => {
            let schema = Options::json_schema();
            let mut out = io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &schema)?;
            writeln!(out)?;
            Ok(())
        }
        Command::Defaults { path } => {
            options.save(&path)?;
            log::info!("wrote options to {}", path.display());
            Ok(())
        }
        Command::Presets { dir } => {
            let mut out = io::stdout().lock();
            for name in Options::list_presets(&dir) {
                writeln!(out, "{name}")?;
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
