//! spring - Terminal front-end for the spring engine
//!
//! Run with: cargo run -- [direct|frequency|wide|attack]
//!
//! The terminal belongs to the UI, so logs go to a file: `$SPRING_LOG`, or
//! `spring.log` in the temp directory.

mod app;
mod ui;

use std::{ffi::OsString, fs::File, path::PathBuf};

use app::SpringApp;
use color_eyre::eyre::WrapErr;
use env_logger::{Env, Target};
use spring_theory::{Direct, FrequencyAttack, FrequencyFriction, Variant};

const LOG_PATH_VAR: &str = "SPRING_LOG";

fn log_path(configured: Option<OsString>) -> PathBuf {
    match configured {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => std::env::temp_dir().join("spring.log"),
    }
}

fn init_logging() -> color_eyre::Result<()> {
    let path = log_path(std::env::var_os(LOG_PATH_VAR));
    let file = File::create(&path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging()?;

    let variant: Variant = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<Variant>().wrap_err("invalid variant argument")?,
        None => Variant::Frequency,
    };

    match variant {
        Variant::Direct => SpringApp::new(variant, Direct).run(),
        Variant::Frequency | Variant::WideFrequency => {
            SpringApp::new(variant, FrequencyFriction::default()).run()
        }
        Variant::Attack => SpringApp::new(variant, FrequencyAttack::default()).run(),
    }
}
