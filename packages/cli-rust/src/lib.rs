//! Command-line driver for the Liquid Logic form and table engines.
//!
//! Loads schemas and data from JSON or MsgPack files, runs them through
//! [`liquid_logic_core`], and renders the result as text or JSON.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod render;

pub use commands::{evaluate_form, run_form, run_table, FormOutcome};
pub use config::{Cli, Command, FormArgs, LogFormat, OutputFormat, TableArgs, TableConfig};
pub use error::CliError;

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        assert_eq!(super::TableConfig::default().page_size, 10);
    }
}
