/// where the reaction set and the energy database are read from
pub mod load_from_file;
/// where the numeric arrays of a run are written to
pub mod save_to_file;
