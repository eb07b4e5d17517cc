// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Upstream API clients.
//!
//! Strava is the primary source (OAuth2, activity listing); Hevy is an
//! optional second source (API key, latest gym workout). The two return
//! different shapes for different dashboard panels, so each client exposes
//! its own concrete methods instead of sharing a trait.

pub mod hevy;
pub mod strava;

pub use hevy::HevyClient;
pub use strava::StravaClient;
