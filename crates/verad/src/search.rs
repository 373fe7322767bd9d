//! Structured catalog search.
//!
//! Pure conjunctive filter: every supplied criterion must pass, absent
//! criteria impose nothing, and catalog order is preserved among
//! survivors. Cheap numeric and boolean checks run before the substring
//! text search; that ordering is a cost choice only and does not affect
//! the result set.

use vera_common::{CatalogItem, SearchCriteria};

/// Filter the catalog down to records matching `criteria`. No criteria
/// at all returns the full catalog, which is a valid query, not an error.
pub fn search_items(items: &[CatalogItem], criteria: &SearchCriteria) -> Vec<CatalogItem> {
    if criteria.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| matches(item, criteria))
        .cloned()
        .collect()
}

fn matches(item: &CatalogItem, criteria: &SearchCriteria) -> bool {
    if let Some(budget) = criteria.budget {
        if item.price > budget {
            return false;
        }
    }

    if let Some((min, max)) = criteria.budget_range {
        if item.price < min || item.price > max {
            return false;
        }
    }

    if let Some(brands) = &criteria.brands {
        if !brands.is_empty() {
            let brand_lower = item.brand.to_lowercase();
            let hit = brands.iter().any(|b| brand_lower.contains(&b.to_lowercase()));
            if !hit {
                return false;
            }
        }
    }

    if let Some(min_battery) = criteria.min_battery {
        if item.battery_capacity < min_battery {
            return false;
        }
    }

    if let Some(min_camera) = criteria.min_camera {
        if item.primary_camera_rear < min_camera {
            return false;
        }
    }

    if let Some(min_ram) = criteria.min_ram {
        if item.ram_capacity < min_ram {
            return false;
        }
    }

    if let Some(min_refresh) = criteria.min_refresh_rate {
        if item.refresh_rate < min_refresh {
            return false;
        }
    }

    if let Some(wants_5g) = criteria.has_5g {
        if wants_5g && !item.has_5g {
            return false;
        }
    }

    // Text search last: the expensive check
    if let Some(query) = &criteria.query {
        let query_lower = query.to_lowercase();
        let model_hit = item.model.to_lowercase().contains(&query_lower);
        let brand_hit = item.brand.to_lowercase().contains(&query_lower);
        if !model_hit && !brand_hit {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(brand: &str, model: &str, price: u32, battery: u32, camera: u16, has_5g: bool) -> CatalogItem {
        CatalogItem {
            brand: brand.to_string(),
            model: model.to_string(),
            price,
            rating: 80,
            has_5g,
            has_nfc: false,
            has_ir_blaster: false,
            processor_brand: "snapdragon".to_string(),
            num_cores: 8,
            processor_speed: 2.8,
            battery_capacity: battery,
            fast_charging_available: true,
            fast_charging: 33,
            ram_capacity: 8,
            internal_memory: 128,
            screen_size: 6.5,
            refresh_rate: 120,
            num_rear_cameras: 3,
            num_front_cameras: 1,
            os: "android".to_string(),
            primary_camera_rear: camera,
            primary_camera_front: 16,
            extended_memory_available: true,
            resolution_width: 1080,
            resolution_height: 2400,
        }
    }

    fn catalog() -> Vec<CatalogItem> {
        vec![
            item("Google", "Pixel 8a", 52999, 4492, 64, true),
            item("OnePlus", "OnePlus 12R", 39999, 5500, 50, true),
            item("Samsung", "Galaxy M35 5G", 19999, 6000, 50, true),
            item("Realme", "Narzo 60", 14999, 5000, 32, false),
        ]
    }

    #[test]
    fn no_criteria_returns_everything_in_order() {
        let items = catalog();
        let results = search_items(&items, &SearchCriteria::default());
        assert_eq!(results.len(), items.len());
        let models: Vec<&str> = results.iter().map(|i| i.model.as_str()).collect();
        assert_eq!(models, vec!["Pixel 8a", "OnePlus 12R", "Galaxy M35 5G", "Narzo 60"]);
    }

    #[test]
    fn budget_is_an_upper_bound() {
        let criteria = SearchCriteria {
            budget: Some(30000),
            ..Default::default()
        };
        let results = search_items(&catalog(), &criteria);
        assert!(results.iter().all(|i| i.price <= 30000));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn budget_range_is_inclusive() {
        let criteria = SearchCriteria {
            budget_range: Some((14999, 19999)),
            ..Default::default()
        };
        let results = search_items(&catalog(), &criteria);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn brand_allow_list_matches_substrings() {
        let criteria = SearchCriteria {
            brands: Some(vec!["one".to_string(), "samsung".to_string()]),
            ..Default::default()
        };
        let results = search_items(&catalog(), &criteria);
        let models: Vec<&str> = results.iter().map(|i| i.model.as_str()).collect();
        assert_eq!(models, vec!["OnePlus 12R", "Galaxy M35 5G"]);
    }

    #[test]
    fn criteria_are_conjunctive() {
        let criteria = SearchCriteria {
            budget: Some(45000),
            min_battery: Some(5400),
            has_5g: Some(true),
            ..Default::default()
        };
        let results = search_items(&catalog(), &criteria);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|i| i.battery_capacity >= 5400 && i.has_5g));
    }

    #[test]
    fn text_query_matches_model_or_brand() {
        let criteria = SearchCriteria {
            query: Some("pixel".to_string()),
            ..Default::default()
        };
        assert_eq!(search_items(&catalog(), &criteria).len(), 1);

        let criteria = SearchCriteria {
            query: Some("realme".to_string()),
            ..Default::default()
        };
        assert_eq!(search_items(&catalog(), &criteria).len(), 1);
    }

    #[test]
    fn impossible_conjunction_is_empty_not_an_error() {
        let criteria = SearchCriteria {
            budget: Some(10000),
            min_camera: Some(100),
            ..Default::default()
        };
        assert!(search_items(&catalog(), &criteria).is_empty());
    }
}
