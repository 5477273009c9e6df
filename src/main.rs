//! Heritage Viewer - headless session runner
//!
//! Replays a JSON script of viewer steps (mesh selection, load completion,
//! pointer input, reference-length typing) against the in-memory host and
//! prints the final host state as JSON.
//!
//! Usage: `heritage-viewer [config.json] script.json`

use heritage_viewer::app::{load_script_from_file, ScriptError, ScriptRunner};
use heritage_viewer::scene::serialization::{load_config_from_file, SerializationError};
use heritage_viewer::scene::ViewerConfig;
use std::path::PathBuf;
use std::process::ExitCode;

fn run(config_path: Option<PathBuf>, script_path: PathBuf) -> Result<String, ScriptError> {
    let config = match config_path {
        Some(path) => load_config_from_file(&path)?,
        None => ViewerConfig::default(),
    };
    let script = load_script_from_file(&script_path)?;

    let mut runner = ScriptRunner::new(config);
    runner.run(&script)?;

    let host = runner.into_host();
    let snapshot = serde_json::to_string_pretty(&host).map_err(SerializationError::from)?;
    Ok(snapshot)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let (config_path, script_path) = match args.len() {
        1 => (None, args.remove(0)),
        2 => {
            let script = args.remove(1);
            (Some(args.remove(0)), script)
        }
        _ => {
            eprintln!("Usage: heritage-viewer [config.json] script.json");
            return ExitCode::from(2);
        }
    };

    log::info!("Heritage Viewer - replaying {}", script_path.display());

    match run(config_path, script_path) {
        Ok(snapshot) => {
            println!("{}", snapshot);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
