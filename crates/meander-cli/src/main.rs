//! meander CLI - plan and generate meander trace segments from a JSON config.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use meander_gen::{load_config, GeneratorConfig, GeometryKernel, MeanderGenerator};
use meander_kernel::{MockKernel, TruckKernel};

#[derive(Parser)]
#[command(name = "meander")]
#[command(about = "Meander trace generator for patch antennas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit the segments into a geometry kernel and print the report
    Generate {
        /// Generator config (JSON)
        config: PathBuf,
        /// Override the number of segments
        #[arg(short, long)]
        turns: Option<u32>,
        /// Geometry kernel to emit into
        #[arg(short, long, value_enum, default_value_t = KernelChoice::Truck)]
        kernel: KernelChoice,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the planned segments without touching a kernel
    Plan {
        /// Generator config (JSON)
        config: PathBuf,
        #[arg(short, long)]
        turns: Option<u32>,
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KernelChoice {
    Mock,
    Truck,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            turns,
            kernel,
            pretty,
        } => generate(&config, turns, kernel, pretty),
        Commands::Plan {
            config,
            turns,
            pretty,
        } => plan(&config, turns, pretty),
    }
}

fn read_config(path: &Path, turns: Option<u32>) -> Result<GeneratorConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut config = load_config(&json).with_context(|| format!("loading {}", path.display()))?;
    if let Some(turns) = turns {
        config = config.with_turns(turns);
        config.validate()?;
    }
    Ok(config)
}

fn generate(path: &Path, turns: Option<u32>, kernel: KernelChoice, pretty: bool) -> Result<()> {
    let generator = MeanderGenerator::new(read_config(path, turns)?);

    let mut mock;
    let mut truck;
    let kernel: &mut dyn GeometryKernel = match kernel {
        KernelChoice::Mock => {
            mock = MockKernel::new();
            &mut mock
        }
        KernelChoice::Truck => {
            truck = TruckKernel::new();
            &mut truck
        }
    };

    let report = generator.run(kernel)?;
    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }
    println!("{}", report.to_json(pretty)?);
    Ok(())
}

fn plan(path: &Path, turns: Option<u32>, pretty: bool) -> Result<()> {
    let planned = MeanderGenerator::new(read_config(path, turns)?).plan()?;
    let json = if pretty {
        serde_json::to_string_pretty(&planned)?
    } else {
        serde_json::to_string(&planned)?
    };
    println!("{}", json);
    Ok(())
}
