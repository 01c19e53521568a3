use serde::{Deserialize, Serialize};

use crate::measurement::Measurement;

pub fn haversine_distance(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    const R: f64 = 6372.8; // Radius of the earth in km

    let d_lat = (p2.0 - p1.0).to_radians();
    let d_lon = (p2.1 - p1.1).to_radians();
    let lat1 = p1.0.to_radians();
    let lat2 = p2.0.to_radians();

    let a = f64::sin(d_lat / 2.).powi(2)
        + f64::cos(lat1) * f64::cos(lat2) * f64::sin(d_lon / 2.).powi(2);
    let c = 2. * f64::asin(f64::sqrt(a));

    R * c
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_latitude: f64,
    pub min_longitude: f64,
    pub max_latitude: f64,
    pub max_longitude: f64,
}

/// Route and heartrate statistics derived from a session's measurements.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionSummary {
    pub measurement_count: usize,
    pub first_timestamp: String,
    pub last_timestamp: String,
    pub start: (f64, f64),
    pub destination: (f64, f64),
    pub bounds: Bounds,
    pub min_heartrate: i32,
    pub max_heartrate: i32,
    pub average_heartrate: f64,
    /// Kilometres along the recorded track.
    pub distance: f64,
}

impl SessionSummary {
    pub fn from_measurements(measurements: &[Measurement]) -> Option<Self> {
        let first = measurements.first()?;
        let last = measurements.last()?;

        let mut bounds = Bounds {
            min_latitude: first.latitude,
            min_longitude: first.longitude,
            max_latitude: first.latitude,
            max_longitude: first.longitude,
        };
        let mut min_heartrate = first.heartrate;
        let mut max_heartrate = first.heartrate;
        let mut heartrate_sum = 0i64;

        for measurement in measurements {
            bounds.min_latitude = bounds.min_latitude.min(measurement.latitude);
            bounds.min_longitude = bounds.min_longitude.min(measurement.longitude);
            bounds.max_latitude = bounds.max_latitude.max(measurement.latitude);
            bounds.max_longitude = bounds.max_longitude.max(measurement.longitude);
            min_heartrate = min_heartrate.min(measurement.heartrate);
            max_heartrate = max_heartrate.max(measurement.heartrate);
            heartrate_sum += measurement.heartrate as i64;
        }

        let distance = measurements
            .windows(2)
            .map(|pair| haversine_distance(pair[0].position(), pair[1].position()))
            .sum();

        Some(Self {
            measurement_count: measurements.len(),
            first_timestamp: first.timestamp.clone(),
            last_timestamp: last.timestamp.clone(),
            start: first.position(),
            destination: last.position(),
            bounds,
            min_heartrate,
            max_heartrate,
            average_heartrate: heartrate_sum as f64 / measurements.len() as f64,
            distance,
        })
    }
}
