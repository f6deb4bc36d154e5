pub mod format;
pub mod loader;
