use std::fs;
use std::path::PathBuf;

use finder_rs::extensions::{Lamp, ScriptWriter, ScriptWriterConfig};
use finder_rs::telemetry::init_default_tracing;

const USAGE: &str = "usage: kosmos_calibration_script [--config <path.json>]";

#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let _ = init_default_tracing();

    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
            ScriptWriterConfig::from_json_str(&raw).map_err(|err| err.to_string())?
        }
        None => ScriptWriterConfig::default(),
    };

    let mut writer = ScriptWriter::new(config).map_err(|err| err.to_string())?;
    // stderr keeps stdout a clean script
    for line in writer.setup_summary() {
        eprintln!("{line}");
    }
    writer.take_bias(5);
    for lamp in [Lamp::Neon, Lamp::Argon, Lamp::Krypton] {
        writer.take_lamps(lamp, 3, "");
    }
    writer.take_lamps(Lamp::Quartz, 10, "");
    writer.take_bias(5);

    println!("{writer}");
    Ok(())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut parsed = CliArgs::default();

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_owned())?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`\n{USAGE}")),
        }
    }
    Ok(parsed)
}
