//! nsg: reflection glue generator for annotated C++ projects
//!
//! `nsg generate` scans headers for UCLASS/USTRUCT/UPROPERTY annotations and
//! writes a mirrored tree with exported create/destroy/get/set functions plus
//! the `getGeneratedScripts` registration table. `nsg inspect` loads the
//! compiled module back through the dynamic bridge.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nativescript_cli::commands::{generate, inspect, GenerateOptions, InspectOptions};
use nativescript_cli::logging;

#[derive(Parser)]
#[command(name = "nsg")]
#[command(about = "Reflection glue generator and module inspector", long_about = None)]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate glue for every annotated header under a project root
    Generate {
        /// Project root to scan
        input: PathBuf,
        /// Output directory for the generated tree
        output: PathBuf,
        /// Config file (defaults to <input>/nsg.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Fail when two exported symbols would collide
        #[arg(long)]
        deny_collisions: bool,
        /// Do not write ns.h
        #[arg(long)]
        no_support_header: bool,
        /// Also write scripts.metadata.json
        #[arg(long)]
        metadata_json: bool,
    },

    /// List the types a compiled module registers
    Inspect {
        /// Path to the shared module
        module: PathBuf,
        /// Print JSON
        #[arg(long)]
        json: bool,
        /// Let a later registration replace an earlier one of the same name
        #[arg(long)]
        overwrite_duplicates: bool,
        /// Skip types whose symbols cannot be resolved
        #[arg(long)]
        skip_broken: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            deny_collisions,
            no_support_header,
            metadata_json,
        } => {
            let summary = generate::execute(&GenerateOptions {
                input,
                output,
                config,
                deny_collisions,
                no_support_header,
                metadata_json,
            })?;
            if !cli.quiet {
                println!("{}", summary);
            }
        }

        Commands::Inspect {
            module,
            json,
            overwrite_duplicates,
            skip_broken,
        } => {
            let options = InspectOptions {
                module,
                json,
                overwrite_duplicates,
                skip_broken,
            };
            match inspect::execute(&options)? {
                Some(report) if options.json => println!("{}", report.render_json()?),
                Some(report) => print!("{}", report.render_text()),
                None => {
                    eprintln!("error: could not open module {}", options.module.display());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
