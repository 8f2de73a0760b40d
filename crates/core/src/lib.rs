//! Domain types and pure logic for the Virtual Andon console.
//!
//! Nothing in this crate performs I/O; the GraphQL client, notification
//! relay and views build on these types.

pub mod classify;
pub mod entity;
pub mod error;
pub mod listing;
pub mod messages;
pub mod modal;
pub mod notification;
pub mod types;
pub mod validation;
