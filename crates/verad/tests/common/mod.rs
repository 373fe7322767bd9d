//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use std::sync::Arc;

use vera_common::llm::{LanguageModel, ScriptedModel};
use vera_common::CatalogItem;
use verad::catalog::CatalogStore;
use verad::config::Config;
use verad::state::AppState;

/// Catalog record builder with sane mid-range defaults.
pub fn item(brand: &str, model: &str, price: u32, rating: u8) -> CatalogItem {
    CatalogItem {
        brand: brand.to_string(),
        model: model.to_string(),
        price,
        rating,
        has_5g: true,
        has_nfc: true,
        has_ir_blaster: false,
        processor_brand: "snapdragon".to_string(),
        num_cores: 8,
        processor_speed: 2.8,
        battery_capacity: 5000,
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

/// A small but realistic slice of the production catalog.
pub fn fixture_catalog() -> Vec<CatalogItem> {
    let mut pixel_8a = item("Google", "Pixel 8a", 52999, 84);
    pixel_8a.primary_camera_rear = 64;
    pixel_8a.battery_capacity = 4492;
    pixel_8a.screen_size = 6.1;

    let mut pixel_8_pro = item("Google", "Pixel 8 Pro", 99999, 89);
    pixel_8_pro.ram_capacity = 12;
    pixel_8_pro.internal_memory = 256;
    pixel_8_pro.screen_size = 6.7;

    let mut oneplus_12r = item("OnePlus", "OnePlus 12R", 39999, 86);
    oneplus_12r.battery_capacity = 5500;
    oneplus_12r.screen_size = 6.78;
    oneplus_12r.fast_charging = 100;

    let mut oneplus_12 = item("OnePlus", "OnePlus 12", 64999, 88);
    oneplus_12.ram_capacity = 12;
    oneplus_12.internal_memory = 256;
    oneplus_12.battery_capacity = 5400;

    let mut m35 = item("Samsung", "Galaxy M35 5G", 19999, 78);
    m35.battery_capacity = 6000;
    m35.ram_capacity = 6;
    m35.screen_size = 6.6;

    let mut s24 = item("Samsung", "Galaxy S24", 74999, 87);
    s24.battery_capacity = 4000;
    s24.internal_memory = 256;
    s24.screen_size = 6.2;

    let mut note13 = item("Xiaomi", "Redmi Note 13 Pro", 23999, 80);
    note13.primary_camera_rear = 200;
    note13.battery_capacity = 5100;
    note13.internal_memory = 256;

    let mut realme12 = item("Realme", "Realme 12 Pro 5G", 25999, 79);
    realme12.screen_size = 6.7;

    let mut narzo = item("Realme", "Narzo 60", 14999, 72);
    narzo.primary_camera_rear = 64;
    narzo.has_5g = false;
    narzo.refresh_rate = 90;
    narzo.ram_capacity = 6;
    narzo.screen_size = 6.4;

    vec![
        pixel_8a,
        pixel_8_pro,
        oneplus_12r,
        oneplus_12,
        m35,
        s24,
        note13,
        realme12,
        narzo,
    ]
}

/// Test config: production semantics, but no backoff waits.
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.llm.max_retries = 0;
    config.llm.initial_backoff_ms = 1;
    config.llm.max_backoff_ms = 2;
    config
}

/// Engine state whose LLM never answers; everything runs on the
/// deterministic paths.
pub fn state_with_dead_llm() -> AppState {
    AppState::with_parts(
        fast_config(),
        CatalogStore::from_items(fixture_catalog()),
        Arc::new(ScriptedModel::unreachable_model()),
    )
}

/// Engine state with a scripted LLM.
pub fn state_with_llm(llm: Arc<dyn LanguageModel>) -> AppState {
    AppState::with_parts(
        fast_config(),
        CatalogStore::from_items(fixture_catalog()),
        llm,
    )
}
