/// argument parsing and the run of one analysis from the command line
pub mod cli_main;
