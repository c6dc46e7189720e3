//! qranchor-lib: QR-to-anchor binding management
//!
//! This crate keeps placed objects tied to the QR codes that summoned them,
//! across sessions:
//! - `mapping`: durable QR-text to anchor-uuid record
//! - `anchor`: the platform spatial-anchor service boundary
//! - `detect`: scanner, camera projector and raycaster boundaries
//! - `manager`: the detection pass and the startup reconciliation pass
//! - `selection`: single-slot hover/select highlighting

pub mod anchor;
pub mod config;
pub mod consts;
pub mod detect;
pub mod geometry;
pub mod manager;
pub mod mapping;
pub mod platform;
pub mod prefs;
pub mod registry;
pub mod selection;
pub mod world;
