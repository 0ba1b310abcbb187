//! tapedeck-core — picks a "show of the day" from a live-music archive.
//!
//! The interesting parts are [`selector`] (the layered search cascade that
//! turns an artist + `MM-DD` day marker into a concrete show) and [`tracks`]
//! (reducing a show's raw file manifest to an ordered, playable track list).
//! Everything else is plumbing: the archive HTTP client, the configured
//! artist list, the optional setlist lookup, and local config/settings.

pub mod archive;
pub mod artists;
pub mod config;
pub mod error;
pub mod model;
pub mod platform;
pub mod selector;
pub mod setlist;
pub mod settings;
pub mod tracks;
