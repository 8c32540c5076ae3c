mod directory_pruner;
mod file_scanner;
mod path_validator;
mod volume_ejector;

pub use directory_pruner::prune_empty_directories;
pub use file_scanner::scan_all_files;
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
pub use volume_ejector::eject_volume;
