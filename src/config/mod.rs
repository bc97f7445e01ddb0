//! Configuration: `todovault.toml` and directory resolution.

pub mod settings;

pub use settings::{default_config_path, default_data_dir, Settings};
