//! meshgen CLI - builds the fixed example meshes and inspects VTK files.
//!
//! Usage: meshgen [COMMAND] [OPTIONS]
//!
//! Without a command the Hamburg grid is written to the current directory.
//! Run `meshgen --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};

use meshgen::algo::Progress;
use meshgen::builders::{BuildOptions, Builder};
use meshgen::io::vtk;
use meshgen::mesh::MeshInfo;

#[derive(Parser)]
#[command(name = "meshgen")]
#[command(author, version, about = "Quad/hex mesh generation CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build meshes and write them as VTK files
    Build {
        /// Builders to run (default: hamburg)
        #[arg(value_enum)]
        builders: Vec<Builder>,

        /// Run every builder
        #[arg(long, conflicts_with = "builders")]
        all: bool,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Display information about a VTK file
    Info {
        /// Input VTK file
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        None => {
            for report in Builder::Hamburg.run(Path::new(""), &BuildOptions::new())? {
                println!("{}\n", report);
            }
        }

        Some(Commands::Build {
            builders,
            all,
            output,
            sequential,
        }) => {
            let builders = if all {
                Builder::ALL.to_vec()
            } else if builders.is_empty() {
                vec![Builder::default()]
            } else {
                builders
            };
            cmd_build(&builders, output.as_deref(), sequential)?;
        }

        Some(Commands::Info { input }) => {
            cmd_info(&input)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // a new builder starts from zero again
        if current == 0 {
            max_percent.store(0, Ordering::Relaxed);
        }
        let previous = max_percent.fetch_max(percent, Ordering::Relaxed);
        if percent <= previous && percent != 100 && current != 0 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        // pad to clear the previous, possibly longer, message
        eprint!("\r[{}{}] {:3}% {:<40}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_build(
    builders: &[Builder],
    output: Option<&Path>,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output.unwrap_or(Path::new(""));
    let options = BuildOptions::new()
        .with_parallel(!sequential)
        .with_progress(create_progress());

    for &builder in builders {
        let start = Instant::now();
        let reports = builder.run(output, &options)?;
        log::info!("{} finished in {:.2?}", builder, start.elapsed());

        for report in reports {
            println!("{}\n", report);
        }
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let grid = vtk::load(input)?;

    println!("File: {}", input.display());
    println!("Title: {}", grid.title);
    println!("Points: {}", grid.n_points());
    println!("Records: {}", grid.n_cells());

    let info = match grid.dimension() {
        2 => grid.into_triangulation::<2>()?.info(),
        3 => grid.into_triangulation::<3>()?.info(),
        d => return Err(format!("no quadrilateral or hexahedral cells (dimension {})", d).into()),
    };
    print_info(&info);

    Ok(())
}

fn print_info(info: &MeshInfo) {
    println!("Dimension: {}", info.dimension);
    println!("Cells: {}", info.n_active_cells);
    println!("Vertices: {}", info.n_vertices);

    if let Some((min, max)) = info.bounding_box {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min[0], min[1], min[2], max[0], max[1], max[2]
        );
    }

    let measure = if info.dimension == 2 { "Area" } else { "Volume" };
    println!("{}: {:.6}", measure, info.total_measure);
}
