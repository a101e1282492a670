//! sheetkeep is a terminal character sheet tracker for fifth-edition tabletop
//! games.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`character`] owns the data model: records, the roster, derived armor
//!   class, on-disk storage and the debounced background writer.
//! - [`api`] talks to the public rules API and turns its answers into
//!   lookups, autocomplete suggestions and tooltips.
//! - [`core`] holds configuration and the editor state machine.
//! - [`ui`] renders the full-screen editor and runs its event loop.
//! - [`cli`] parses arguments and implements the scriptable subcommands.
//!
//! The binary (`src/main.rs`) routes straight through [`crate::cli::main`].

pub mod api;
pub mod character;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
