use binsift_core::artifacts::recyclebin::error::RecycleBinError;
use binsift_core::artifacts::recyclebin::{grab_info2, grab_modern};
use binsift_core::output::output_report;
use binsift_core::structs::options::{OutputFormat, RunOptions};
use binsift_core::{filter_delimiter_escapes, resolve_codepage, setup_logging};
use clap::{ArgAction, Parser, Subcommand};
use log::info;
use std::panic;
use std::process;

const EXIT_OK: i32 = 0;
const EXIT_ARG: i32 = 1;
const EXIT_OPEN: i32 = 2;
const EXIT_WRITE: i32 = 3;
const EXIT_FORMAT: i32 = 4;
const EXIT_RECORD_ISSUE: i32 = 5;
/// Reserved for live-system inspection, which this build does not ship
#[allow(dead_code)]
const EXIT_LIVE_UNAVAILABLE: i32 = 6;
const EXIT_UNHANDLED: i32 = 64;

#[derive(Parser)]
#[clap(version, about = "Windows Recycle Bin metadata decoder", long_about = None, disable_version_flag = true)]
struct Args {
    /// Write the report to FILE (atomically) instead of stdout
    #[clap(short, long, global = true, value_name = "FILE")]
    output: Option<String>,

    /// Report format
    #[clap(short, long, global = true, default_value = "text", value_parser = ["text", "xml", "json"])]
    format: String,

    /// Shorthand for -f xml
    #[clap(short = 'x', long = "xml", global = true)]
    xml: bool,

    /// Render times in the local zone instead of UTC
    #[clap(short = 'z', long = "localtime", global = true)]
    localtime: bool,

    /// Suppress the text report preamble
    #[clap(short = 'n', long = "no-heading", global = true)]
    no_heading: bool,

    /// Field delimiter for the text report, backslash escapes honored
    #[clap(short = 't', long = "delimiter", global = true, value_name = "STRING")]
    delimiter: Option<String>,

    /// Print version and exit
    #[clap(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a legacy INFO2 index file (Windows 95 - XP/2003)
    Info2 {
        /// Code page of the 8-bit path field (Ex: CP1252)
        #[clap(short = 'l', long = "legacy-encoding", value_name = "CODEPAGE")]
        codepage: Option<String>,

        /// Path to the INFO2 file
        file: String,
    },
    /// Decode a $Recycle.bin directory or a single $I file (Vista and later)
    Modern {
        /// Path to the directory or index file
        path: String,
    },
}

fn main() {
    setup_logging();
    let args = Args::parse();

    let status = match panic::catch_unwind(|| run(&args)) {
        Ok(result) => result,
        Err(_err) => {
            eprintln!("[binsift] Unexpected internal failure");
            EXIT_UNHANDLED
        }
    };
    process::exit(status);
}

fn run(args: &Args) -> i32 {
    let mut options = RunOptions {
        format: if args.xml {
            OutputFormat::Xml
        } else {
            match args.format.as_str() {
                "xml" => OutputFormat::Xml,
                "json" => OutputFormat::Json,
                _ => OutputFormat::Text,
            }
        },
        localtime: args.localtime,
        no_heading: args.no_heading,
        output_file: args.output.clone(),
        ..Default::default()
    };
    if let Some(delimiter) = &args.delimiter {
        options.delimiter = filter_delimiter_escapes(delimiter);
    }

    let grabbed = match &args.command {
        Commands::Info2 { codepage, file } => {
            if let Some(name) = codepage {
                options.legacy_encoding = match resolve_codepage(name) {
                    Ok(result) => Some(result),
                    Err(err) => {
                        eprintln!("[binsift] {err}");
                        return EXIT_ARG;
                    }
                };
            }
            grab_info2(file, &options)
        }
        Commands::Modern { path } => grab_modern(path, &options),
    };

    let mut data = match grabbed {
        Ok(result) => result,
        Err(err) => {
            eprintln!("[binsift] {err}");
            return exit_code(&err);
        }
    };
    info!(
        "[binsift] Decoded {} records from {}",
        data.records.len(),
        data.meta.source_path
    );

    if let Err(err) = output_report(&mut data, &options) {
        eprintln!("[binsift] {err}");
        return EXIT_WRITE;
    }

    if !data.warnings.is_empty() {
        return EXIT_RECORD_ISSUE;
    }
    EXIT_OK
}

/// Map decoder failures onto the documented exit codes
fn exit_code(err: &RecycleBinError) -> i32 {
    match err {
        RecycleBinError::MissingCodepage => EXIT_ARG,
        RecycleBinError::OpenFile | RecycleBinError::ReadFile | RecycleBinError::NotRecycleBin => {
            EXIT_OPEN
        }
        RecycleBinError::BrokenFile | RecycleBinError::InconsistentVersion => EXIT_FORMAT,
    }
}
