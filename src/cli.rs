use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::cascade::CascadeResult;
use crate::conversion::{
    compute_conversion, format_watts, Conversion, DbToDbm, DbmToWatts, PowerConversions, WattsToDb,
    WattsToDbm,
};
use crate::error::Result;
use crate::file::load_chain;
use crate::node::CascadeNode;
use crate::stage::Stage;
use crate::workbench::Workbench;

/// RF cascade calculator
///
/// Cascades gain, noise figure, P1dB and IP3 through a chain of stages and
/// converts between dB, dBm and Watts.
#[derive(Parser, Debug)]
#[command(name = "rfcascade")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cascade a chain file and write an HTML report next to it
    Cascade {
        /// Path to a toml chain file
        file: PathBuf,

        /// Where to write the report (defaults to the chain file with an .html extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the lineup only
        #[arg(long)]
        no_report: bool,
    },

    /// Evaluate a single power-unit conversion
    Convert {
        #[command(subcommand)]
        kind: ConvertKind,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConvertKind {
    /// Offset a reference level: dB + reference dBm
    DbToDbm {
        #[arg(allow_negative_numbers = true)]
        db: f64,
        #[arg(allow_negative_numbers = true)]
        reference_dbm: f64,
    },
    /// dBm to Watts
    DbmToWatts {
        #[arg(allow_negative_numbers = true)]
        dbm: f64,
    },
    /// Watts to dBm
    WattsToDbm {
        #[arg(allow_negative_numbers = true)]
        watts: f64,
    },
    /// Watts relative to a reference power, in dB
    WattsToDb {
        #[arg(allow_negative_numbers = true)]
        watts: f64,
        #[arg(allow_negative_numbers = true)]
        reference_watts: f64,
    },
}

impl From<ConvertKind> for Conversion {
    fn from(kind: ConvertKind) -> Self {
        match kind {
            ConvertKind::DbToDbm { db, reference_dbm } => {
                Conversion::DbToDbm(DbToDbm { db, reference_dbm })
            }
            ConvertKind::DbmToWatts { dbm } => Conversion::DbmToWatts(DbmToWatts { dbm }),
            ConvertKind::WattsToDbm { watts } => Conversion::WattsToDbm(WattsToDbm { watts }),
            ConvertKind::WattsToDb {
                watts,
                reference_watts,
            } => Conversion::WattsToDb(WattsToDb {
                watts,
                reference_watts,
            }),
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Cascade {
            file,
            output,
            no_report,
        } => run_cascade(&file, output, no_report),
        Commands::Convert { kind } => {
            let conversion = Conversion::from(kind);
            let value = compute_conversion(&conversion)?;
            println!("{}", format_conversion(&conversion, value));
            Ok(())
        }
    }
}

fn run_cascade(file: &Path, output: Option<PathBuf>, no_report: bool) -> Result<()> {
    println!("Chain Path: {}", file.display());
    let mut workbench = Workbench::from(load_chain(file)?);

    let result = workbench.calculate()?.clone();
    let lineup = workbench.lineup()?;
    print_cascade(workbench.stages(), &lineup, &result);
    print_conversions(workbench.conversions());

    if no_report {
        return Ok(());
    }
    let output_html_path = output.unwrap_or_else(|| default_report_path(file));
    write_report(&workbench, &output_html_path)
}

#[cfg(feature = "report")]
fn write_report(workbench: &Workbench, output_html_path: &Path) -> Result<()> {
    println!("Generating HTML report at: {}", output_html_path.display());
    crate::report::generate_html_report(workbench, output_html_path)
}

#[cfg(not(feature = "report"))]
fn write_report(_workbench: &Workbench, output_html_path: &Path) -> Result<()> {
    tracing::warn!(
        path = %output_html_path.display(),
        "built without the report feature, skipping HTML report"
    );
    Ok(())
}

/// `chain.toml` becomes `chain.html` in the same directory.
pub fn default_report_path(file: &Path) -> PathBuf {
    file.with_extension("html")
}

pub fn format_conversion(conversion: &Conversion, value: f64) -> String {
    match conversion {
        Conversion::DbmToWatts(_) => format!("{} = {}", conversion, format_watts(value)),
        _ => format!("{} = {:.2} {}", conversion, value, conversion.result_unit()),
    }
}

pub fn print_error(error: &str) {
    const RED: &str = "\x1b[31m";
    const RESET: &str = "\x1b[0m";
    eprintln!("{}Error: {error}{}", RED, RESET);
}

pub fn print_cascade(stages: &[Stage], lineup: &[CascadeNode], result: &CascadeResult) {
    println!();
    for (i, (stage, node)) in stages.iter().zip(lineup).enumerate() {
        println!("\nStage {}: {}", i + 1, stage.name);

        // the formatting `{:>8.2}` aligns positive and negative numbers on the decimal,
        // with two digits after the decimal (hundredths place)
        println!("Stage Gain:\t\t{:>8.2} dB", stage.gain_db);
        println!("Stage NF:\t\t{:>8.2} dB", stage.noise_figure_db);
        println!("Stage P1dB:\t\t{:>8.2} dBm", stage.p1db_dbm);
        println!("Stage IP3:\t\t{:>8.2} dBm", stage.ip3_dbm);
        println!("Cumulative Gain:\t{:>8.2} dB", node.cumulative_gain_db);
        println!("Cumulative Noise Figure:{:>8.2} dB", node.noise_figure_db);
        println!("Input-Referred P1dB:\t{:>8.2} dBm", node.input_p1db_dbm);
        println!("Input-Referred IP3:\t{:>8.2} dBm", node.input_ip3_dbm);
    }
    println!();
    println!("Final Cascade Summary:");
    println!("----------------------");
    println!("Number of Stages: {}", stages.len());
    println!("Gain:\t{:>8.2} dB", result.total_gain_db);
    println!("NF:\t{:>8.2} dB", result.total_noise_figure_db);
    println!("P1dB:\t{:>8.2} dBm", result.total_p1db_dbm);
    println!("IP3:\t{:>8.2} dBm", result.total_ip3_dbm);
    println!("SFDR:\t{:>8.2} dB", result.sfdr_db);
}

pub fn print_conversions(conversions: &PowerConversions) {
    println!();
    println!("Power Conversions:");
    println!("------------------");
    let entries = [
        (
            Conversion::DbToDbm(*conversions.db_to_dbm.input()),
            conversions.db_to_dbm.result(),
        ),
        (
            Conversion::DbmToWatts(*conversions.dbm_to_watts.input()),
            conversions.dbm_to_watts.result(),
        ),
        (
            Conversion::WattsToDbm(*conversions.watts_to_dbm.input()),
            conversions.watts_to_dbm.result(),
        ),
        (
            Conversion::WattsToDb(*conversions.watts_to_db.input()),
            conversions.watts_to_db.result(),
        ),
    ];
    for (conversion, result) in entries {
        match result {
            Ok(value) => println!("{}", format_conversion(&conversion, value)),
            Err(err) => println!("{} = undefined ({})", conversion, err),
        }
    }
    println!();
}
