//! `tzconv` CLI — convert times and schedules between timezones, inspect
//! offsets, and run timezone detection from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Convert a wall-clock time
//! tzconv convert 14:00 --from Africa/Lagos --to America/New_York
//!
//! # Show whether the conversion crossed midnight
//! tzconv convert 23:30 --from UTC --to Asia/Tokyo --detailed
//!
//! # Convert weekly availability (JSON array on stdin or -i FILE)
//! tzconv availability --from Europe/Berlin --to Asia/Kolkata -i availability.json
//!
//! # Same, moving each range to the day its converted start falls on
//! tzconv availability --from UTC --to Asia/Tokyo --rollover -i availability.json
//!
//! # Convert time slots, moving the weekday on rollover
//! tzconv slots --from UTC --to Asia/Tokyo --rollover -i slots.json
//!
//! # Offset between two zones
//! tzconv offset Africa/Lagos America/New_York
//!
//! # Describe a timezone
//! tzconv info Asia/Kathmandu --source manual
//!
//! # Run the detection chain (override, platform, network, UTC)
//! tzconv detect --override Europe/Lisbon
//! tzconv detect --no-network
//!
//! # Validate an identifier (exit code 1 when invalid)
//! tzconv validate America/New_York
//!
//! # List the curated timezones with their current offsets
//! tzconv list
//! ```
//!
//! Set `RUST_LOG=debug` to see which detection step answered and why
//! conversions were left unchanged.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::process;
use tz_engine::{AvailabilityRange, Detector, DetectorConfig, TimeSlot, TimezoneSource};

#[derive(Parser)]
#[command(
    name = "tzconv",
    version,
    about = "Timezone conversion and detection CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an HH:MM wall-clock time between timezones
    Convert {
        /// Time of day, HH:MM (24-hour)
        time: String,
        /// Source timezone (IANA identifier)
        #[arg(long)]
        from: String,
        /// Target timezone (IANA identifier)
        #[arg(long)]
        to: String,
        /// Also print the day shift (-1, 0, +1); fails on invalid input
        #[arg(long)]
        detailed: bool,
    },
    /// Convert a JSON array of availability ranges
    Availability {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Move each range's day when its start crosses midnight
        #[arg(long)]
        rollover: bool,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Convert a JSON array of time slots
    Slots {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Move each slot's day when the conversion crosses midnight
        #[arg(long)]
        rollover: bool,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show the current offset from one timezone to another
    Offset {
        from: String,
        to: String,
        /// Print fractional hours instead of minutes
        #[arg(long)]
        hours: bool,
    },
    /// Describe a timezone as JSON
    Info {
        timezone: String,
        /// Provenance tag to attach: auto, manual or default
        #[arg(long, default_value = "manual")]
        source: TimezoneSource,
    },
    /// Resolve the current timezone through the detection chain
    Detect {
        /// Explicit timezone that wins over detection when valid
        #[arg(long = "override")]
        override_tz: Option<String>,
        /// Skip the IP-based network lookup
        #[arg(long)]
        no_network: bool,
        /// TOML config file for the detector
        #[arg(long)]
        config: Option<String>,
    },
    /// Check whether a timezone identifier is valid
    Validate { timezone: String },
    /// List commonly used timezones
    List,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            time,
            from,
            to,
            detailed,
        } => {
            if detailed {
                let converted =
                    tz_engine::convert_time_detailed(&time, &from, &to).with_context(|| {
                        format!("Failed to convert {} from {} to {}", time, from, to)
                    })?;
                println!("{} ({:+} day)", converted.time, converted.day_offset);
            } else {
                println!("{}", tz_engine::convert_time(&time, &from, &to));
            }
        }
        Commands::Availability {
            from,
            to,
            rollover,
            input,
            output,
        } => {
            let json = read_input(input.as_deref())?;
            let ranges: Vec<AvailabilityRange> =
                serde_json::from_str(&json).context("Invalid availability JSON")?;
            let converted = if rollover {
                tz_engine::convert_availability_with_rollover(&ranges, &from, &to)
            } else {
                tz_engine::convert_availability(&ranges, &from, &to)
            };
            write_output(output.as_deref(), &serde_json::to_string_pretty(&converted)?)?;
        }
        Commands::Slots {
            from,
            to,
            rollover,
            input,
            output,
        } => {
            let json = read_input(input.as_deref())?;
            let slots: Vec<TimeSlot> =
                serde_json::from_str(&json).context("Invalid time slot JSON")?;
            let converted = if rollover {
                tz_engine::convert_time_slots_with_rollover(&slots, &from, &to)
            } else {
                tz_engine::convert_time_slots(&slots, &from, &to)
            };
            write_output(output.as_deref(), &serde_json::to_string_pretty(&converted)?)?;
        }
        Commands::Offset { from, to, hours } => {
            let minutes = tz_engine::get_timezone_offset(&from, &to);
            if hours {
                println!("{}", tz_engine::get_timezone_offset_hours(&from, &to));
            } else {
                println!("{}", minutes);
            }
            println!("{}", tz_engine::format_timezone_offset(minutes));
        }
        Commands::Info { timezone, source } => {
            let info = tz_engine::get_timezone_info(&timezone, source);
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::Detect {
            override_tz,
            no_network,
            config,
        } => {
            let mut config = match config {
                Some(path) => DetectorConfig::from_file(&path)
                    .with_context(|| format!("Failed to load config: {}", path))?,
                None => DetectorConfig::default(),
            }
            .with_env_overrides()
            .context("Invalid TZ_ENGINE_* environment variable")?;
            if no_network {
                config.geo.enabled = false;
            }

            let detector = Detector::new(config);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            let info = runtime.block_on(detector.resolve(override_tz.as_deref()));
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::Validate { timezone } => {
            if tz_engine::is_valid_timezone(&timezone) {
                println!("valid");
            } else {
                println!("invalid");
                process::exit(1);
            }
        }
        Commands::List => {
            for tz in tz_engine::get_common_timezones() {
                let info = tz_engine::get_timezone_info(tz, TimezoneSource::Default);
                println!("{:<32} {}  {}", tz, info.utc_offset_string, info.display_name);
            }
        }
    }

    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
