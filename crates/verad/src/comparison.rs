//! Multi-item comparison.
//!
//! Computes a fixed, ordered table of feature rows across 2+ items, with
//! a winner per row where the feature has a polarity (price is
//! lower-is-better, capability metrics are higher-is-better, yes/no rows
//! have no winner). Ties go to the first item in input order; the
//! summary tie-breaks the same way.

use vera_common::{CatalogItem, ComparisonResult, ComparisonRow, VeraError};

#[derive(Clone, Copy)]
enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
    /// Categorical row: values are displayed, no ordering is asserted.
    Unordered,
}

struct FeatureSpec {
    label: &'static str,
    polarity: Polarity,
    /// Numeric value used for winner determination; ignored for
    /// unordered rows.
    metric: fn(&CatalogItem) -> f64,
    render: fn(&CatalogItem) -> String,
}

const FEATURE_ROWS: &[FeatureSpec] = &[
    FeatureSpec {
        label: "Price",
        polarity: Polarity::LowerIsBetter,
        metric: |p| p.price as f64,
        render: |p| format!("₹{}", p.price),
    },
    FeatureSpec {
        label: "Rating",
        polarity: Polarity::HigherIsBetter,
        metric: |p| p.rating as f64,
        render: |p| format!("{}/100", p.rating),
    },
    FeatureSpec {
        label: "Camera",
        polarity: Polarity::HigherIsBetter,
        metric: |p| p.primary_camera_rear as f64,
        render: |p| format!("{}MP", p.primary_camera_rear),
    },
    FeatureSpec {
        label: "Battery",
        polarity: Polarity::HigherIsBetter,
        metric: |p| p.battery_capacity as f64,
        render: |p| format!("{}mAh", p.battery_capacity),
    },
    FeatureSpec {
        label: "RAM",
        polarity: Polarity::HigherIsBetter,
        metric: |p| p.ram_capacity as f64,
        render: |p| format!("{}GB", p.ram_capacity),
    },
    FeatureSpec {
        label: "Storage",
        polarity: Polarity::HigherIsBetter,
        metric: |p| p.internal_memory as f64,
        render: |p| format!("{}GB", p.internal_memory),
    },
    FeatureSpec {
        label: "Display",
        polarity: Polarity::HigherIsBetter,
        metric: |p| p.screen_size as f64,
        render: |p| format!("{}\"", p.screen_size),
    },
    FeatureSpec {
        label: "Refresh Rate",
        polarity: Polarity::HigherIsBetter,
        metric: |p| p.refresh_rate as f64,
        render: |p| format!("{}Hz", p.refresh_rate),
    },
    FeatureSpec {
        label: "5G",
        polarity: Polarity::Unordered,
        metric: |_| 0.0,
        render: |p| if p.has_5g { "Yes".into() } else { "No".into() },
    },
    FeatureSpec {
        label: "Fast Charging",
        polarity: Polarity::Unordered,
        metric: |_| 0.0,
        render: |p| {
            if p.fast_charging_available {
                format!("{}W", p.fast_charging)
            } else {
                "No".into()
            }
        },
    },
];

/// Compare 2+ items. Fewer than 2 is a caller bug, not a user-facing
/// path, and fails loudly; the pipeline validates the count beforehand.
pub fn compare_items(items: &[CatalogItem]) -> Result<ComparisonResult, VeraError> {
    if items.len() < 2 {
        return Err(VeraError::InsufficientItems(items.len()));
    }

    let rows: Vec<ComparisonRow> = FEATURE_ROWS
        .iter()
        .map(|spec| {
            let values: Vec<String> = items.iter().map(|item| (spec.render)(item)).collect();
            let winner = winner_index(spec, items);
            ComparisonRow {
                feature: spec.label.to_string(),
                values,
                winner,
            }
        })
        .collect();

    let summary = summarize(items, &rows);

    Ok(ComparisonResult {
        items: items.to_vec(),
        rows,
        summary,
    })
}

/// First index holding the extreme value, per the row's polarity.
fn winner_index(spec: &FeatureSpec, items: &[CatalogItem]) -> Option<usize> {
    let metrics: Vec<f64> = items.iter().map(|item| (spec.metric)(item)).collect();
    match spec.polarity {
        Polarity::Unordered => None,
        Polarity::HigherIsBetter => {
            let best = metrics.iter().cloned().fold(f64::MIN, f64::max);
            metrics.iter().position(|&v| v == best)
        }
        Polarity::LowerIsBetter => {
            let best = metrics.iter().cloned().fold(f64::MAX, f64::min);
            metrics.iter().position(|&v| v == best)
        }
    }
}

/// Tally row wins and declare the overall leader; win-count ties default
/// to the first item in input order, matching the per-row tie-break.
fn summarize(items: &[CatalogItem], rows: &[ComparisonRow]) -> String {
    let wins: Vec<usize> = (0..items.len())
        .map(|idx| rows.iter().filter(|row| row.winner == Some(idx)).count())
        .collect();

    let max_wins = wins.iter().copied().max().unwrap_or(0);
    let leader = wins.iter().position(|&w| w == max_wins).unwrap_or(0);

    format!("{} leads in {} categories.", items[leader].model, max_wins)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(model: &str, price: u32, rating: u8, battery: u32) -> CatalogItem {
        CatalogItem {
            brand: "Generic".to_string(),
            model: model.to_string(),
            price,
            rating,
            has_5g: true,
            has_nfc: false,
            has_ir_blaster: false,
            processor_brand: "snapdragon".to_string(),
            num_cores: 8,
            processor_speed: 2.8,
            battery_capacity: battery,
            fast_charging_available: true,
            fast_charging: 67,
            ram_capacity: 8,
            internal_memory: 128,
            screen_size: 6.5,
            refresh_rate: 120,
            num_rear_cameras: 3,
            num_front_cameras: 1,
            os: "android".to_string(),
            primary_camera_rear: 50,
            primary_camera_front: 16,
            extended_memory_available: false,
            resolution_width: 1080,
            resolution_height: 2400,
        }
    }

    #[test]
    fn fewer_than_two_items_is_an_error() {
        assert!(matches!(
            compare_items(&[]),
            Err(VeraError::InsufficientItems(0))
        ));
        assert!(matches!(
            compare_items(&[item("Solo", 20000, 80, 5000)]),
            Err(VeraError::InsufficientItems(1))
        ));
    }

    #[test]
    fn lower_price_wins_the_price_row() {
        let a = item("Cheap", 19999, 70, 5000);
        let b = item("Pricey", 39999, 85, 5000);
        let result = compare_items(&[a, b]).unwrap();

        let price_row = result.rows.iter().find(|r| r.feature == "Price").unwrap();
        assert_eq!(price_row.winner, Some(0));
        assert_eq!(price_row.values, vec!["₹19999", "₹39999"]);
    }

    #[test]
    fn higher_rating_wins_the_rating_row() {
        let a = item("Cheap", 19999, 70, 5000);
        let b = item("Pricey", 39999, 85, 5000);
        let result = compare_items(&[a, b]).unwrap();

        let rating_row = result.rows.iter().find(|r| r.feature == "Rating").unwrap();
        assert_eq!(rating_row.winner, Some(1));
    }

    #[test]
    fn categorical_rows_have_no_winner() {
        let result = compare_items(&[item("A", 1, 1, 1), item("B", 2, 2, 2)]).unwrap();
        for label in ["5G", "Fast Charging"] {
            let row = result.rows.iter().find(|r| r.feature == label).unwrap();
            assert_eq!(row.winner, None, "{} row should be unordered", label);
        }
    }

    #[test]
    fn row_ties_go_to_the_first_item() {
        let a = item("First", 20000, 80, 5000);
        let b = item("Second", 20000, 80, 5000);
        let result = compare_items(&[a, b]).unwrap();

        for row in result.rows.iter().filter(|r| r.winner.is_some()) {
            assert_eq!(row.winner, Some(0), "tie on {} should go to index 0", row.feature);
        }
        assert!(result.summary.starts_with("First leads in"));
    }

    #[test]
    fn summary_names_the_item_with_most_wins() {
        // Better on everything except price
        let mut champ = item("Champ", 39999, 90, 6000);
        champ.primary_camera_rear = 108;
        champ.ram_capacity = 12;
        champ.internal_memory = 256;
        champ.screen_size = 6.8;
        champ.refresh_rate = 144;
        let budget = item("Budget", 19999, 70, 4500);
        let result = compare_items(&[budget, champ]).unwrap();

        // Champ takes 7 capability rows, Budget takes only Price
        assert_eq!(result.summary, "Champ leads in 7 categories.");
    }

    #[test]
    fn three_way_comparison_counts_all_rows() {
        let result = compare_items(&[
            item("A", 10000, 70, 4000),
            item("B", 20000, 80, 5000),
            item("C", 30000, 90, 6000),
        ])
        .unwrap();

        assert_eq!(result.items.len(), 3);
        for row in &result.rows {
            assert_eq!(row.values.len(), 3);
        }
    }
}
