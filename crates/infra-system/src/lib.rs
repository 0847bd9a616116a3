// Casebook Infrastructure - System Adapters
// Implements: LocalFileScanner

pub mod local_file_scanner;

pub use local_file_scanner::WalkDirScanner;
