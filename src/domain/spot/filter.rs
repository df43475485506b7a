//! Listing filters for parking spots

use super::model::{ParkingSpot, SpotStatus, SpotType};

/// Optional listing filters, composed with logical AND.
///
/// `search` matches case-insensitively as a substring against the spot
/// number or the parked vehicle's license plate; unoccupied spots can
/// only match via their spot number.
#[derive(Debug, Clone, Default)]
pub struct SpotFilter {
    pub status: Option<SpotStatus>,
    pub spot_type: Option<SpotType>,
    pub search: Option<String>,
}

impl SpotFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.spot_type.is_none() && self.search.is_none()
    }

    pub fn matches(&self, spot: &ParkingSpot) -> bool {
        if let Some(status) = self.status {
            if spot.status != status {
                return false;
            }
        }
        if let Some(spot_type) = self.spot_type {
            if spot.spot_type != spot_type {
                return false;
            }
        }
        if let Some(ref search) = self.search {
            let needle = search.to_lowercase();
            let number_hit = spot.spot_number.to_lowercase().contains(&needle);
            let license_hit = spot
                .vehicle_license
                .as_deref()
                .is_some_and(|plate| plate.to_lowercase().contains(&needle));
            if !number_hit && !license_hit {
                return false;
            }
        }
        true
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::spot::ParkingSpot;
    use chrono::Utc;

    fn occupied_spot(number: &str, plate: &str) -> ParkingSpot {
        let mut spot = ParkingSpot::new(number, SpotType::Regular, 500, None).unwrap();
        spot.check_in(plate, None, None, Utc::now()).unwrap();
        spot
    }

    #[test]
    fn empty_filter_passes_all() {
        let spot = ParkingSpot::new("A1", SpotType::Regular, 500, None).unwrap();
        let filter = SpotFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&spot));
    }

    #[test]
    fn status_filter_is_exact() {
        let spot = ParkingSpot::new("A1", SpotType::Regular, 500, None).unwrap();
        let filter = SpotFilter {
            status: Some(SpotStatus::Occupied),
            ..Default::default()
        };
        assert!(!filter.matches(&spot));
    }

    #[test]
    fn search_matches_spot_number_case_insensitively() {
        let spot = ParkingSpot::new("A1", SpotType::Regular, 500, None).unwrap();
        let filter = SpotFilter {
            search: Some("a1".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&spot));
    }

    #[test]
    fn search_matches_license_plate() {
        let spot = occupied_spot("B7", "XYZ-999");
        let filter = SpotFilter {
            search: Some("xyz".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&spot));
    }

    #[test]
    fn unoccupied_spot_only_matches_by_number() {
        let spot = ParkingSpot::new("B7", SpotType::Regular, 500, None).unwrap();
        let filter = SpotFilter {
            search: Some("xyz".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&spot));
    }

    #[test]
    fn filters_compose_with_and() {
        let occupied = occupied_spot("A1", "ABC-123");
        let vacant = ParkingSpot::new("A12", SpotType::Regular, 500, None).unwrap();

        let filter = SpotFilter {
            status: Some(SpotStatus::Available),
            search: Some("A1".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&occupied));
        assert!(filter.matches(&vacant));
    }

    #[test]
    fn type_filter_is_exact() {
        let spot = ParkingSpot::new("E1", SpotType::Electric, 500, None).unwrap();
        let hit = SpotFilter {
            spot_type: Some(SpotType::Electric),
            ..Default::default()
        };
        let miss = SpotFilter {
            spot_type: Some(SpotType::Vip),
            ..Default::default()
        };
        assert!(hit.matches(&spot));
        assert!(!miss.matches(&spot));
    }
}
