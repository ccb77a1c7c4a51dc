//! soxwrap - command line front end for the sox orchestration layer
//!
//! Usage: soxwrap [--config config.toml] <subcommand> <input> [options]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use soxwrap_core::{exec, AudioSource, Channel, Sox, SoxwrapConfig};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

mod output;

use output::{print_json, FileResult, SplitResult};

#[derive(Parser, Debug)]
#[command(name = "soxwrap")]
#[command(about = "Convert, trim, split, join, and inspect audio via sox", long_about = None)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Convert an audio file to another format
    Convert {
        input: String,
        /// Where to put the result; defaults to a kept temp file
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long)]
        input_format: Option<String>,
        #[arg(long)]
        output_format: Option<String>,
        /// Extra output options, e.g. "-c 1 -b 16 -r 16k"
        #[arg(long)]
        output_options: Option<String>,
        /// Use the stock mono/16-bit/16k preset
        #[arg(long)]
        default_preset: bool,
        /// Remix a single channel (left or right)
        #[arg(long)]
        channel: Option<String>,
        /// Delete the input after a successful run
        #[arg(long)]
        gc: bool,
    },
    /// Cut silence out of a file without splitting it
    RemoveSilence {
        input: String,
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long)]
        silence_duration: Option<String>,
        #[arg(long)]
        silence_level: Option<String>,
        #[arg(long)]
        input_format: Option<String>,
        #[arg(long)]
        output_format: Option<String>,
        #[arg(long)]
        gc: bool,
    },
    /// Split a file into segments at silence boundaries
    Split {
        input: String,
        /// Directory to collect the segments in; defaults to a kept temp dir
        #[arg(short, long)]
        output_dir: Option<String>,
        #[arg(long)]
        silence_duration: Option<String>,
        #[arg(long)]
        silence_level: Option<String>,
        #[arg(long)]
        input_format: Option<String>,
        #[arg(long)]
        output_format: Option<String>,
        #[arg(long)]
        output_filename: Option<String>,
        #[arg(long)]
        gc: bool,
    },
    /// Concatenate same-format files
    Concat {
        /// Input files, in order
        inputs: Vec<String>,
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long)]
        output_format: Option<String>,
    },
    /// Print the parsed statistics report as JSON
    Stats {
        input: String,
        #[arg(long)]
        input_format: Option<String>,
        #[arg(long)]
        gc: bool,
    },
    /// Run the feature extractor and print the decoded result as JSON
    Features {
        input: String,
        #[arg(long)]
        sample_rate: Option<String>,
        #[arg(long)]
        gc: bool,
    },
    /// Escape hatch: raw option strings and effect
    Run {
        input: String,
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long)]
        global_options: Option<String>,
        #[arg(long)]
        input_options: Option<String>,
        #[arg(long)]
        output_options: Option<String>,
        #[arg(long)]
        effect: Option<String>,
        #[arg(long)]
        output_format: Option<String>,
        #[arg(long)]
        gc: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    let config = match &args.config {
        Some(path) => SoxwrapConfig::load(Path::new(path))?,
        None => SoxwrapConfig::default(),
    };
    config.validate()?;

    if !exec::available(&config.sox_program) {
        log::warn!(
            "{} not found on PATH; operations will fail until it is installed",
            config.sox_program
        );
    }

    let sox = Sox::new(config);
    run_command(&sox, args.command)
}

fn run_command(sox: &Sox, command: Cmd) -> Result<()> {
    match command {
        Cmd::Convert {
            input,
            output,
            input_format,
            output_format,
            output_options,
            default_preset,
            channel,
            gc,
        } => {
            let mut options = sox.config().convert.clone();
            if let Some(v) = input_format {
                options.input_format = v;
            }
            if let Some(v) = output_format {
                options.output_format = v;
            }
            if output_options.is_some() {
                options.output_options = output_options;
            }
            if default_preset {
                options.default_preset = true;
            }
            if let Some(v) = channel {
                options.channel = Some(v.parse::<Channel>()?);
            }
            options.gc = gc;

            let start = Instant::now();
            let result = sox.convert(AudioSource::path(&input), &options)?;
            finish_file(&input, output, result, start)
        }
        Cmd::RemoveSilence {
            input,
            output,
            silence_duration,
            silence_level,
            input_format,
            output_format,
            gc,
        } => {
            let mut options = sox.config().remove_silence.clone();
            if let Some(v) = silence_duration {
                options.silence_duration = v;
            }
            if let Some(v) = silence_level {
                options.silence_level = v;
            }
            if let Some(v) = input_format {
                options.input_format = v;
            }
            if let Some(v) = output_format {
                options.output_format = v;
            }
            options.gc = gc;

            let start = Instant::now();
            let result = sox.remove_silence(AudioSource::path(&input), &options)?;
            finish_file(&input, output, result, start)
        }
        Cmd::Split {
            input,
            output_dir,
            silence_duration,
            silence_level,
            input_format,
            output_format,
            output_filename,
            gc,
        } => {
            let mut options = sox.config().split.clone();
            if let Some(v) = silence_duration {
                options.silence_duration = v;
            }
            if let Some(v) = silence_level {
                options.silence_level = v;
            }
            if let Some(v) = input_format {
                options.input_format = v;
            }
            if let Some(v) = output_format {
                options.output_format = v;
            }
            if let Some(v) = output_filename {
                options.output_filename = v;
            }
            options.gc = gc;

            let start = Instant::now();
            let split = sox.split_by_silence(AudioSource::path(&input), &options)?;

            let outputs = match output_dir {
                Some(dir) => {
                    let dir = PathBuf::from(dir);
                    std::fs::create_dir_all(&dir).with_context(|| {
                        format!("Failed to create output directory: {}", dir.display())
                    })?;
                    let mut moved = Vec::with_capacity(split.files.len());
                    for file in &split.files {
                        let name = file.file_name().context("segment without a file name")?;
                        let target = dir.join(name);
                        std::fs::copy(file, &target).with_context(|| {
                            format!("Failed to copy segment to {}", target.display())
                        })?;
                        moved.push(target.display().to_string());
                    }
                    moved
                }
                None => {
                    // Keep the temp directory so the segments survive exit.
                    let kept = split.dir.into_path();
                    log::info!("Segments kept in {}", kept.display());
                    split
                        .files
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect()
                }
            };

            print_json(&SplitResult {
                status: "success",
                input,
                count: outputs.len(),
                outputs,
                processing_time_seconds: start.elapsed().as_secs_f64(),
            });
            Ok(())
        }
        Cmd::Concat {
            inputs,
            output,
            output_format,
        } => {
            if inputs.len() < 2 {
                anyhow::bail!("concat needs at least two input files");
            }
            let mut options = sox.config().concat.clone();
            if let Some(v) = output_format {
                options.output_format = v;
            }

            let start = Instant::now();
            let joined = inputs.join(", ");
            let result = sox.concat(AudioSource::list(inputs), &options)?;
            finish_file(&joined, output, result, start)
        }
        Cmd::Stats {
            input,
            input_format,
            gc,
        } => {
            let mut options = sox.config().stats.clone();
            if let Some(v) = input_format {
                options.input_format = v;
            }
            options.gc = gc;

            let report = sox.stats(AudioSource::path(&input), &options)?;
            print_json(&report);
            Ok(())
        }
        Cmd::Features {
            input,
            sample_rate,
            gc,
        } => {
            let mut options = sox.config().features.clone();
            if let Some(v) = sample_rate {
                options.sample_rate = v;
            }
            options.gc = gc;

            let features = sox.extract_features(AudioSource::path(&input), &options)?;
            print_json(&features);
            Ok(())
        }
        Cmd::Run {
            input,
            output,
            global_options,
            input_options,
            output_options,
            effect,
            output_format,
            gc,
        } => {
            let mut options = soxwrap_core::CustomOptions {
                global_options,
                input_options,
                output_options,
                effect,
                ..Default::default()
            };
            if let Some(v) = output_format {
                options.output_format = v;
            }
            options.gc = gc;

            let start = Instant::now();
            let result = sox.run_custom(AudioSource::path(&input), &options)?;
            finish_file(&input, output, result, start)
        }
    }
}

/// Persist the temp output and print the result object.
fn finish_file(
    input: &str,
    output: Option<String>,
    result: NamedTempFile,
    start: Instant,
) -> Result<()> {
    let final_path = match output {
        Some(path) => {
            // Copy rather than rename so the target may live on another
            // filesystem than the temp directory.
            std::fs::copy(result.path(), &path)
                .with_context(|| format!("Failed to write output to {}", path))?;
            path
        }
        None => {
            let (_file, kept) = result
                .keep()
                .context("Failed to keep temporary output file")?;
            kept.display().to_string()
        }
    };

    print_json(&FileResult {
        status: "success",
        input: input.to_string(),
        output: final_path,
        processing_time_seconds: start.elapsed().as_secs_f64(),
    });
    Ok(())
}
