//! Tattoo Studio core
//!
//! Local-first data layer for an independent tattoo artist:
//! - `state`: record store, SQLite backend and the four collections
//! - `report`: upcoming appointments, sales totals, agenda month grid
//! - `export`: iCalendar and vCard documents
//! - `media`: inline gallery image payloads and folder import
//! - `config`: where the data lives

pub mod config;
pub mod error;
pub mod export;
pub mod media;
pub mod report;
pub mod state;

pub use config::StudioConfig;
pub use state::Studio;
