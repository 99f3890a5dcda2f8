/// Post-processing of solver CSV output: lumping species columns into bins, reading traces
pub mod csv_processing;
/// terminal and file logging setup
pub mod logger;
