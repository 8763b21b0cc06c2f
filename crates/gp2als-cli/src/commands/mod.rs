pub mod import;

pub use import::run_import;
