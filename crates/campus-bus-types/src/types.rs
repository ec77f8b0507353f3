//! Shared value types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ValidationError;

/// Operational status reported by a driver
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusStatus {
    #[default]
    OnTime,
    Late,
    Breakdown,
}

impl BusStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusStatus::OnTime => "on-time",
            BusStatus::Late => "late",
            BusStatus::Breakdown => "breakdown",
        }
    }

    /// Late and broken-down buses show up as alerts on the dashboard
    pub fn is_alert(&self) -> bool {
        !matches!(self, BusStatus::OnTime)
    }
}

impl fmt::Display for BusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "on-time" => Ok(BusStatus::OnTime),
            "late" => Ok(BusStatus::Late),
            "breakdown" => Ok(BusStatus::Breakdown),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// Latitude/longitude pair in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn lat_in_range(lat: f64) -> bool {
        lat.is_finite() && (-90.0..=90.0).contains(&lat)
    }

    pub fn lng_in_range(lng: f64) -> bool {
        lng.is_finite() && (-180.0..=180.0).contains(&lng)
    }

    pub fn is_valid(&self) -> bool {
        Self::lat_in_range(self.lat) && Self::lng_in_range(self.lng)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&BusStatus::OnTime).unwrap(), "\"on-time\"");
        assert_eq!(
            serde_json::from_str::<BusStatus>("\"breakdown\"").unwrap(),
            BusStatus::Breakdown
        );
        assert!(serde_json::from_str::<BusStatus>("\"early\"").is_err());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("late".parse::<BusStatus>().unwrap(), BusStatus::Late);
        let err = "LATE".parse::<BusStatus>().unwrap_err();
        assert_eq!(err.code(), "invalid_status");
    }

    #[test]
    fn test_alert_statuses() {
        assert!(!BusStatus::OnTime.is_alert());
        assert!(BusStatus::Late.is_alert());
        assert!(BusStatus::Breakdown.is_alert());
    }

    #[test]
    fn test_geo_point_bounds() {
        assert!(GeoPoint::new(90.0, -180.0).is_valid());
        assert!(GeoPoint::new(23.88, 90.40).is_valid());
        assert!(!GeoPoint::new(90.01, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 180.5).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }
}
