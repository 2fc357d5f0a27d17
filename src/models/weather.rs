// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weather widget payload served by the proxy's `/weather` route.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Current conditions at a coordinate, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/types/generated/")
)]
pub struct WeatherReport {
    /// Degrees Celsius
    pub temperature: f64,
    pub feels_like: f64,
    /// Short condition label (e.g. "Clouds")
    pub condition: String,
    /// Relative humidity, percent
    pub humidity: f64,
    /// Metres per second
    pub wind_speed: f64,
    /// Lower-cased condition, used as an icon key
    pub icon: String,
    /// "{city}, {country}"
    pub location: String,
}
