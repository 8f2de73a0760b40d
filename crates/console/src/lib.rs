//! Headless Virtual Andon console.
//!
//! [`view::EntityListView`] implements the list, search, sort and modal
//! CRUD flow shared by every entity screen; [`cli`] drives it from the
//! command line.

pub mod cli;
pub mod config;
pub mod view;

pub use config::{ConfigError, ConsoleConfig};
pub use view::{EntityListView, SubmitOutcome};
