use serde::{Deserialize, Serialize};

/// Parameters for one itinerary generation request.
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    pub duration_days: u32,
}

/// Current conditions for a single city, normalized from the raw payload.
///
/// Temperature is rounded to the nearest whole degree at parse time, so a
/// reading is either fully populated or never constructed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: i32,
    pub condition: String,
}
