//! Boardsmith CLI - build circuit board design files from the command line.

use anyhow::Context;
use boardsmith::builder::addables::{Addable, BOARD_ADDABLES, GROUP_ADDABLES, PROJECT_ADDABLES};
use boardsmith::gerber::{
    convert_elements_to_gerber_commands, stringify_gerber_command_layers, GerberLayerName,
};
use boardsmith::{BuildOutput, ConnectivityMap, DesignFile, LengthUnit, UnitSystem};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boardsmith")]
#[command(about = "Declarative circuit board builder", long_about = None)]
#[command(version)]
struct Cli {
    /// Log build progress to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a design file into design elements
    Build {
        /// Path to a .json design file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        #[command(flatten)]
        overrides: BuildOverrides,
    },

    /// Build a design file and emit Gerber layers
    Gerber {
        /// Path to a .json design file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write one .gbr file per layer into this directory instead of stdout
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Only emit this layer
        #[arg(short, long, value_enum)]
        layer: Option<LayerArg>,

        #[command(flatten)]
        overrides: BuildOverrides,
    },

    /// List the kinds each container accepts
    Addables {
        /// Container to list
        #[arg(value_enum, default_value = "board")]
        container: ContainerArg,
    },
}

#[derive(clap::Args)]
struct BuildOverrides {
    /// Base unit for bare numbers (overrides the design file)
    #[arg(long, value_enum)]
    units: Option<UnitArg>,

    /// Default trace width in the base unit
    #[arg(long)]
    trace_width: Option<f64>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Element list as JSON
    Json,
    /// Human-readable counts and connected sets
    Summary,
    /// Counts as JSON
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Mm,
    Cm,
    Um,
    In,
    Mil,
}

impl From<UnitArg> for LengthUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Mm => LengthUnit::Mm,
            UnitArg::Cm => LengthUnit::Cm,
            UnitArg::Um => LengthUnit::Um,
            UnitArg::In => LengthUnit::In,
            UnitArg::Mil => LengthUnit::Mil,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LayerArg {
    FCu,
    BCu,
    FSilkScreen,
    EdgeCuts,
}

impl From<LayerArg> for GerberLayerName {
    fn from(layer: LayerArg) -> Self {
        match layer {
            LayerArg::FCu => GerberLayerName::FCu,
            LayerArg::BCu => GerberLayerName::BCu,
            LayerArg::FSilkScreen => GerberLayerName::FSilkScreen,
            LayerArg::EdgeCuts => GerberLayerName::EdgeCuts,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum ContainerArg {
    Project,
    Board,
    Group,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Build {
            file,
            format,
            overrides,
        } => handle_build(&file, format, &overrides).await,
        Commands::Gerber {
            file,
            out_dir,
            layer,
            overrides,
        } => handle_gerber(&file, out_dir.as_deref(), layer, &overrides).await,
        Commands::Addables { container } => {
            handle_addables(container);
            0
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn build(file: &Path, overrides: &BuildOverrides) -> anyhow::Result<BuildOutput> {
    let design = DesignFile::load(file)
        .with_context(|| format!("failed to load {}", file.display()))?;
    let mut options = design.options();
    if let Some(units) = overrides.units {
        options.units = UnitSystem::new(units.into());
    }
    if let Some(width) = overrides.trace_width {
        options.default_trace_width = width;
    }
    let project = design.to_project_with(options)?;
    Ok(project.build().await?)
}

async fn handle_build(file: &Path, format: OutputFormat, overrides: &BuildOverrides) -> i32 {
    let output = match build(file, overrides).await {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return 1;
        }
    };

    match format {
        OutputFormat::Json => match output.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
        OutputFormat::Summary => output_summary(file, &output),
        OutputFormat::Stats => match serde_json::to_string_pretty(&output.stats) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        },
    }
    0
}

fn output_summary(file: &Path, output: &BuildOutput) {
    println!("\nFile: {}", file.display());
    println!("{}", "─".repeat(60));
    println!("  Elements:   {}", output.total_elements());
    println!("  Components: {}", output.stats.components);
    println!("  Ports:      {}", output.stats.ports);
    println!("  Traces:     {}", output.stats.traces);
    println!("  Nets:       {}", output.stats.nets);
    println!("  Pads:       {}", output.stats.pads);
    println!("  Boards:     {}", output.stats.boards);

    let groups = ConnectivityMap::from_elements(&output.elements).groups();
    if groups.is_empty() {
        println!("\n  No connections");
        return;
    }
    println!("\n  Connected sets:");
    for group in groups {
        println!("    - {}", group.join(", "));
    }
}

async fn handle_gerber(
    file: &Path,
    out_dir: Option<&Path>,
    layer: Option<LayerArg>,
    overrides: &BuildOverrides,
) -> i32 {
    let output = match build(file, overrides).await {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return 1;
        }
    };

    let only = layer.map(GerberLayerName::from);
    let layers = stringify_gerber_command_layers(&convert_elements_to_gerber_commands(
        &output.elements,
    ));
    let selected = layers
        .iter()
        .filter(|(name, _)| only.map_or(true, |only| only == **name));

    match out_dir {
        Some(dir) => {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("Error: failed to create {}: {}", dir.display(), e);
                return 1;
            }
            for (name, text) in selected {
                let path = dir.join(name.file_name());
                if let Err(e) = std::fs::write(&path, text) {
                    eprintln!("Error: failed to write {}: {}", path.display(), e);
                    return 1;
                }
                println!("{}", path.display());
            }
        }
        None => {
            for (name, text) in selected {
                println!("G04 ===== {} =====*", name);
                print!("{}", text);
            }
        }
    }
    0
}

fn handle_addables(container: ContainerArg) {
    let (name, addables): (&str, &[Addable]) = match container {
        ContainerArg::Project => ("project", PROJECT_ADDABLES),
        ContainerArg::Board => ("board", BOARD_ADDABLES),
        ContainerArg::Group => ("group", GROUP_ADDABLES),
    };
    println!("Kinds accepted by a {}:\n", name);
    for addable in addables {
        println!("  {}", addable.as_str());
    }
}
