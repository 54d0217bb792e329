//! Core library for the `wxdash` weather dashboard.
//!
//! This crate defines:
//! - Configuration and the persisted theme preference
//! - The station data model and an HTTP provider for it
//! - Derived display values, sun times, sky condition and chart series
//! - The renderer boundary and the orchestration that drives it
//!
//! It is used by `wxdash-cli`, but any other front end can implement
//! [`Renderer`] and call [`run_dashboard`].

pub mod apparent;
pub mod condition;
pub mod config;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
pub mod series;
pub mod state;
pub mod suntime;

pub use config::Config;
pub use dashboard::{DashboardContext, DashboardOutcome, Settled, run_dashboard};
pub use error::DeriveError;
pub use model::{CloudCover, MetarSnapshot, Observation, WindDirection};
pub use provider::{ObservationProvider, provider_from_config};
pub use render::{Chart, Renderer, Slot, SlotState, Snapshot};
pub use series::{ChartSeries, DashboardSeries, build_series};
pub use state::{Theme, UiState};
pub use suntime::{Scenery, Site, SunWindow};
