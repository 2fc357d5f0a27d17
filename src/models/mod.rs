// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod place;
pub mod shared;
pub mod trip;
pub mod weather;

pub use place::{Place, ProviderDetail};
pub use shared::{Author, SharedTripSummary};
pub use trip::{Trip, TripPlace, TripSummary};
pub use weather::WeatherReport;
