pub mod data;
pub mod defaults;
pub mod io;
pub mod orchestrator;

#[cfg(test)]
mod tests;

pub use data::{path_display, Config};
pub use io::ConfigError;
pub use orchestrator::ConfigStore;
