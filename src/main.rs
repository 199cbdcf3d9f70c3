use PlasmaNet::cli::cli_main::run_cli;
use log::{LevelFilter, error};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::process::ExitCode;

pub fn main() -> ExitCode {
    if let Err(e) = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("logger not initialised: {}", e);
    }
    match run_cli() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("analysis failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
