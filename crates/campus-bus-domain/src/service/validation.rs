//! Position report validation

use campus_bus_types::{BusStatus, GeoPoint, ValidationError};

use crate::model::{PositionReport, ValidatedReport};

/// Check a raw report against the bus's capacity.
///
/// Checks run in field order and stop at the first failure. `bus_id` and
/// `route` are trimmed before use.
pub fn validate_report(
    report: &PositionReport,
    capacity: u32,
) -> Result<ValidatedReport, ValidationError> {
    let bus_id = report.bus_id.trim();
    if bus_id.is_empty() {
        return Err(ValidationError::EmptyBusId);
    }

    let route = report.route.trim();
    if route.is_empty() {
        return Err(ValidationError::EmptyRoute);
    }

    if !GeoPoint::lat_in_range(report.lat) {
        return Err(ValidationError::LatitudeOutOfRange(report.lat));
    }
    if !GeoPoint::lng_in_range(report.lng) {
        return Err(ValidationError::LongitudeOutOfRange(report.lng));
    }

    if report.occupancy < 0 {
        return Err(ValidationError::NegativeOccupancy(report.occupancy));
    }
    if report.occupancy > i64::from(capacity) {
        return Err(ValidationError::OccupancyExceedsCapacity {
            occupancy: report.occupancy,
            capacity,
        });
    }

    let status: BusStatus = report.status.parse()?;

    Ok(ValidatedReport {
        bus_id: bus_id.to_string(),
        route: route.to_string(),
        position: GeoPoint::new(report.lat, report.lng),
        // bounded by capacity above
        occupancy: report.occupancy as u32,
        status,
    })
}
