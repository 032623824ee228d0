// Utility Module
// File access for the command line front end

pub mod file_ops;

pub use file_ops::{read_file, read_text_file, write_file, FileError, OutputTarget, STDOUT};
