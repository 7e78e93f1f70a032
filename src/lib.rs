//! A floating panel deck for the terminal.
//!
//! Panels are independent, draggable, resizable windows stacked over the
//! screen, one per [`window::PanelKind`]. A launcher strip lists every kind by
//! priority, docks to either screen edge and collapses to a rail when idle.
//! The layout survives restarts.

pub mod actions;
pub mod app;
pub mod component_context;
pub mod components;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod interaction;
pub mod keybindings;
pub mod layout;
pub mod persistence;
pub mod priority;
pub mod runner;
pub mod theme;
pub mod toolbar;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use app::{Deck, DeckOptions};
