pub mod fs;

pub use fs::make_directory_if_needed;
