#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Refresh cycle, snapshot assembly and configuration for the WebGIS
//! dashboard.
//!
//! On every timer tick the [`refresh::Presenter`] fetches the current
//! survey reports, [`presenter::build_snapshot`] reshapes them into table
//! rows, map markers and an issue-type chart, and the result replaces the
//! snapshot held by the [`refresh::SnapshotStore`]. The HTTP layer only
//! ever reads from that store.

pub mod config;
pub mod export;
pub mod filter;
pub mod presenter;
pub mod refresh;

pub use config::{ConfigError, DashboardConfig};
pub use refresh::{Presenter, PublishedSnapshot, RefreshState, SnapshotStore};
