//! Graph document validation, indexing and force-directed layout.
//!
//! [`graph`] turns a JSON document into a [`graph::ValidatedGraph`] plus the
//! lookups and statistics built over it. [`layout`] runs the simulation and
//! publishes throttled position snapshots for a renderer.

pub mod graph;
pub mod layout;
