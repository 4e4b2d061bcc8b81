//! Composite inventory model and click-interaction protocol.
//!
//! The [`inventory`] module holds the node tree, slots, archetypes, and the
//! speculative transaction engine; [`session`] turns decoded client click
//! messages into committed or rejected transactions against the currently
//! open container.

pub mod inventory;
pub mod session;
