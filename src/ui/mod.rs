//! Terminal UI for the interactive sheet editor.
//!
//! - [`editor_loop`]: the event loop that feeds terminal input into
//!   [`crate::core::app`] and runs the resulting commands.
//! - [`keybindings`]: mode-aware key mapping.
//! - [`renderer`]: frame layout (tabs, field list, armor class, tooltips).
//! - [`lifecycle`]: entering and leaving the alternate screen.
//! - [`picker`]: the autocomplete candidate list.
//!
//! Ownership boundary: this layer presents and captures interaction state,
//! while [`crate::core`] and [`crate::character`] own the sheet logic.

pub mod editor_loop;
pub mod keybindings;
pub mod lifecycle;
pub mod picker;
pub mod renderer;
