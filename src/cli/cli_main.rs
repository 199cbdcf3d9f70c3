use crate::ReactionNetwork::network_errors::NetworkError;
use crate::ReactionNetwork::pipeline::{AnalysisReport, NetworkAnalysis};
use crate::Utils::load_from_file::LoadData;
use crate::Utils::save_to_file::JsonDirectory;
use crate::settings::{AnalysisConfig, CONFIG_FILE};
use clap::Parser;
use log::info;
use std::path::{Path, PathBuf};

/// Reaction network analysis of a plasma chemistry set: incidence matrices, species
/// connectivity against state energy, species graph and its communities.
/// Further settings are read from network_config.json in the working directory.
#[derive(Parser, Debug)]
#[command(author = "Gleb Zaslavsky", version, about)]
pub struct Cli {
    /// Path to the reaction set (JSON written by the chemistry parser)
    #[arg(value_name = "PATH")]
    pub input: PathBuf,
}

/// parses the command line and runs the analysis
pub fn run_cli() -> Result<AnalysisReport, NetworkError> {
    let cli = Cli::parse();
    let config = AnalysisConfig::load_or_default(CONFIG_FILE);
    run_analysis(&cli.input, config)
}

/// one analysis of the reaction set at `input`, arrays written to `config.output_dir`
pub fn run_analysis(input: &Path, config: AnalysisConfig) -> Result<AnalysisReport, NetworkError> {
    let source = LoadData::new(input, &config.energy_database);
    let mut sink = JsonDirectory::new(&config.output_dir);
    let analysis = NetworkAnalysis::new(config);
    let report = analysis.run(&source, &mut sink)?;
    report.pretty_print(
        &analysis.config.display_excluded,
        analysis.config.histogram_bins,
        analysis.config.histogram_range,
    );
    info!(
        "arrays written to {}",
        analysis.config.output_dir.display()
    );
    Ok(report)
}
