//! Catalog data model.
//!
//! `CatalogItem` is the immutable product record the whole pipeline works
//! on. Records are loaded once at process start and never mutated;
//! uniqueness is `(brand, model)` and the resolver/comparator key on the
//! lowercased trimmed model name.

use serde::{Deserialize, Serialize};

/// One phone record with its structured attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub brand: String,
    pub model: String,
    /// Price in rupees.
    pub price: u32,
    /// Aggregate rating on a 0-100 scale.
    pub rating: u8,
    pub has_5g: bool,
    pub has_nfc: bool,
    pub has_ir_blaster: bool,
    pub processor_brand: String,
    pub num_cores: u8,
    /// Clock speed in GHz.
    pub processor_speed: f32,
    /// Battery capacity in mAh.
    pub battery_capacity: u32,
    pub fast_charging_available: bool,
    /// Fast-charging wattage (0 when unavailable).
    pub fast_charging: u16,
    /// RAM in GB.
    pub ram_capacity: u16,
    /// Internal storage in GB.
    pub internal_memory: u16,
    /// Screen diagonal in inches.
    pub screen_size: f32,
    /// Display refresh rate in Hz.
    pub refresh_rate: u16,
    pub num_rear_cameras: u8,
    pub num_front_cameras: u8,
    pub os: String,
    /// Main rear camera resolution in MP.
    pub primary_camera_rear: u16,
    /// Main front camera resolution in MP.
    pub primary_camera_front: u16,
    pub extended_memory_available: bool,
    pub resolution_width: u32,
    pub resolution_height: u32,
}

impl CatalogItem {
    /// Stable identifier used by the resolver and comparator.
    pub fn model_key(&self) -> String {
        self.model.trim().to_lowercase()
    }
}

/// Structured search constraints. Every field is independently optional;
/// absence means unconstrained.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Free-text substring matched against model and brand.
    pub query: Option<String>,
    /// Maximum price.
    pub budget: Option<u32>,
    /// Inclusive `[min, max]` price range.
    pub budget_range: Option<(u32, u32)>,
    /// Brand allow-list (substring match, case-insensitive).
    pub brands: Option<Vec<String>>,
    pub min_battery: Option<u32>,
    pub min_camera: Option<u16>,
    pub min_ram: Option<u16>,
    pub min_refresh_rate: Option<u16>,
    pub has_5g: Option<bool>,
}

impl SearchCriteria {
    /// True when no constraint is set at all.
    pub fn is_empty(&self) -> bool {
        self.query.is_none()
            && self.budget.is_none()
            && self.budget_range.is_none()
            && self.brands.is_none()
            && self.min_battery.is_none()
            && self.min_camera.is_none()
            && self.min_ram.is_none()
            && self.min_refresh_rate.is_none()
            && self.has_5g.is_none()
    }
}

/// Feature axis a user can prioritise when ranking results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityFeature {
    Camera,
    Battery,
    Performance,
    Display,
}

impl PriorityFeature {
    /// Map a feature token from the intent classifier to a priority axis.
    /// "gaming" and "performance" collapse onto the same axis.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "camera" => Some(Self::Camera),
            "battery" => Some(Self::Battery),
            "gaming" | "performance" => Some(Self::Performance),
            "display" => Some(Self::Display),
            _ => None,
        }
    }
}

/// Ranking knobs: optional budget for proximity scoring plus at most one
/// priority feature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingCriteria {
    pub budget: Option<u32>,
    pub priority: Option<PriorityFeature>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_key_is_lowercased_and_trimmed() {
        let item = CatalogItem {
            brand: "OnePlus".to_string(),
            model: " OnePlus 12R ".to_string(),
            price: 39999,
            rating: 86,
            has_5g: true,
            has_nfc: true,
            has_ir_blaster: false,
            processor_brand: "snapdragon".to_string(),
            num_cores: 8,
            processor_speed: 3.2,
            battery_capacity: 5500,
            fast_charging_available: true,
            fast_charging: 100,
            ram_capacity: 8,
            internal_memory: 128,
            screen_size: 6.78,
            refresh_rate: 120,
            num_rear_cameras: 3,
            num_front_cameras: 1,
            os: "android".to_string(),
            primary_camera_rear: 50,
            primary_camera_front: 16,
            extended_memory_available: false,
            resolution_width: 1264,
            resolution_height: 2780,
        };
        assert_eq!(item.model_key(), "oneplus 12r");
    }

    #[test]
    fn empty_criteria_detected() {
        assert!(SearchCriteria::default().is_empty());
        let with_budget = SearchCriteria {
            budget: Some(30000),
            ..Default::default()
        };
        assert!(!with_budget.is_empty());
    }

    #[test]
    fn priority_tokens_map_to_axes() {
        assert_eq!(
            PriorityFeature::from_token("gaming"),
            Some(PriorityFeature::Performance)
        );
        assert_eq!(
            PriorityFeature::from_token("camera"),
            Some(PriorityFeature::Camera)
        );
        assert_eq!(PriorityFeature::from_token("5g"), None);
    }
}
