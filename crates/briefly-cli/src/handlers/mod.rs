//! Command handlers.

pub mod prefs;
pub mod read;
pub mod voices;
