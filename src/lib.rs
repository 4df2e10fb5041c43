//! Heart disease prediction client.
//!
//! Form entries are parsed into a [`input::FeatureVector`], posted to the
//! prediction backend and rendered into a [`view::ResultView`]. When the
//! backend is unreachable a simulated result is rendered instead.

pub mod client;
pub mod coerce;
pub mod config;
pub mod handler;
pub mod input;
pub mod notification;
pub mod prediction;
pub mod view;
