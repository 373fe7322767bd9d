//! Heuristic ranking.
//!
//! Orders a candidate set by a weighted score: base rating, budget
//! proximity, one optional priority-feature term, and flat bonuses. The
//! sort is stable so equal scores keep their catalog order.

use vera_common::{CatalogItem, PriorityFeature, RankingCriteria};

/// Flat penalty for exceeding the budget, regardless of by how much.
const OVER_BUDGET_PENALTY: f64 = 50.0;
/// Full bonus for a price exactly at budget; scales down linearly toward
/// zero for cheaper phones, so "much cheaper" is not "best fit".
const BUDGET_PROXIMITY_WEIGHT: f64 = 20.0;

const BONUS_5G: f64 = 5.0;
const BONUS_HIGH_REFRESH: f64 = 10.0;
const HIGH_REFRESH_THRESHOLD: u16 = 120;

/// Stable-rank items by descending score. Empty input is empty output.
pub fn rank_items(items: Vec<CatalogItem>, criteria: &RankingCriteria) -> Vec<CatalogItem> {
    if items.is_empty() {
        return items;
    }

    let mut scored: Vec<(f64, CatalogItem)> = items
        .into_iter()
        .map(|item| (score_item(&item, criteria), item))
        .collect();

    // Vec::sort_by is stable; ties keep input order
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(_, item)| item).collect()
}

/// Compute the heuristic score for one item.
pub fn score_item(item: &CatalogItem, criteria: &RankingCriteria) -> f64 {
    let mut score = item.rating as f64;

    if let Some(budget) = criteria.budget {
        if budget > 0 {
            let price_ratio = item.price as f64 / budget as f64;
            if price_ratio <= 1.0 {
                score += price_ratio * BUDGET_PROXIMITY_WEIGHT;
            } else {
                score -= OVER_BUDGET_PENALTY;
            }
        }
    }

    match criteria.priority {
        Some(PriorityFeature::Camera) => {
            score += item.primary_camera_rear as f64 * 0.2 + item.num_rear_cameras as f64 * 2.0;
        }
        Some(PriorityFeature::Battery) => {
            score += item.battery_capacity as f64 * 0.003;
            if item.fast_charging_available {
                score += item.fast_charging as f64 * 0.1;
            }
        }
        Some(PriorityFeature::Performance) => {
            score += item.ram_capacity as f64 * 2.0
                + item.processor_speed as f64 * 5.0
                + item.refresh_rate as f64 * 0.1;
        }
        Some(PriorityFeature::Display) => {
            score += item.screen_size as f64 * 2.0
                + item.refresh_rate as f64 * 0.1
                + (item.resolution_width as f64 * item.resolution_height as f64) * 0.00001;
        }
        None => {}
    }

    if item.has_5g {
        score += BONUS_5G;
    }
    if item.refresh_rate >= HIGH_REFRESH_THRESHOLD {
        score += BONUS_HIGH_REFRESH;
    }

    score
}
