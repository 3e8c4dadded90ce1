//! patchbank: list and edit patch bank JSON files from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use patchbank::{BankError, Ranged};
use patchbank::bank::{Program, OPERATOR_COUNT};
use patchbank::bank::command::{Command, Outcome};
use patchbank::bank::patchbank::PatchBank;

/// Patch bank editor for the 8-operator FM sound engine
#[derive(Parser)]
#[command(name = "patchbank")]
#[command(version)]
struct Cli {
    /// Path to the patch bank JSON file
    #[arg(short, long, global = true, default_value = "patch_bank.json")]
    file: PathBuf,

    /// Show debug messages
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the factory patches to the bank file
    Init {
        /// Replace an existing bank file
        #[arg(long)]
        force: bool,
    },

    /// List the patches with their instrument names
    List,

    /// Show the settings of a patch
    Show {
        /// Position of the patch in the list
        index: usize,

        /// Show only this operator (0-7)
        #[arg(short, long)]
        operator: Option<usize>,
    },

    /// Add a patch with the smallest free program number
    New,

    /// Delete a patch
    Delete {
        /// Position of the patch in the list
        index: usize,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Copy a patch to a new program number
    Duplicate {
        /// Position of the patch to copy
        index: usize,

        /// Program number for the copy (0-127)
        #[arg(value_parser = clap::value_parser!(i32).range(0..=127))]
        program: i32,
    },

    /// Sort the patches by program number
    Sort,

    /// Print the register image of a patch
    Registers {
        /// Position of the patch in the list
        index: usize,

        /// MIDI channel volume (0-255)
        #[arg(long, default_value = "255")]
        volume: u8,
    },
}

fn load_or_new(cli: &Cli) -> Result<PatchBank, BankError> {
    if cli.file.exists() {
        PatchBank::load(&cli.file)
    }
    else {
        log::info!("{} not found, starting with an empty bank", cli.file.display());
        Ok(PatchBank::new())
    }
}

fn run(cli: Cli) -> Result<(), BankError> {
    if let Commands::Init { force } = cli.command {
        if cli.file.exists() && !force {
            println!("{} already exists, pass --force to replace it.", cli.file.display());
            return Ok(());
        }
        let bank = PatchBank::factory();
        println!("Writing {} factory patches to {}", bank.len(), cli.file.display());
        return bank.save(&cli.file);
    }

    let mut bank = load_or_new(&cli)?;

    let command = match cli.command {
        Commands::List => {
            print!("{}", bank);
            return Ok(());
        },
        Commands::Show { index, operator } => {
            match operator {
                Some(operator) => println!("{}", bank.operator_view(index, operator)?),
                None => {
                    println!("{}", bank.patch_view(index)?);
                    for operator in 0..OPERATOR_COUNT {
                        println!("\n{}", bank.operator_view(index, operator)?);
                    }
                },
            }
            return Ok(());
        },
        Commands::Registers { index, volume } => {
            let regs = bank.patch(index)?.to_registers(volume);
            for (row, chunk) in regs.chunks(16).enumerate() {
                let bytes: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
                println!("{:02X}: {}", row * 16, bytes.join(" "));
            }
            return Ok(());
        },
        Commands::Delete { index, yes } => {
            if !yes {
                let patch = bank.patch(index)?;
                println!("Not deleting program {} ({}), pass --yes to confirm.",
                    patch.program.value(), patch.instrument_name());
                return Ok(());
            }
            Command::DeletePatch { index }
        },
        Commands::New => Command::NewPatch,
        Commands::Duplicate { index, program } => Command::DuplicatePatch { source: index, program: Program::new(program) },
        Commands::Sort => Command::SortByProgram,
        Commands::Init { .. } => return Ok(()),
    };

    match bank.apply(command)? {
        Outcome::Created(index) => {
            let patch = bank.patch(index)?;
            println!("Created program {} ({})", patch.program.value(), patch.instrument_name());
        },
        Outcome::Deleted(patch) => println!("Deleted program {}", patch.program.value()),
        Outcome::Sorted => println!("Patches sorted by program number"),
        Outcome::Updated(_) => {},
    }

    bank.save(&cli.file)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Unable to initialize logging: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
