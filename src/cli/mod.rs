// mod.rs - CLI module

pub mod args;
pub mod config;
pub mod merge;
pub mod validation;

// Re-export main types for convenience
pub use args::{Args, Command, FlanksArgs, PrimersArgs};
pub use config::Config;
pub use validation::{flank_settings, primer_settings};
