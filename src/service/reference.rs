use crate::error::app_error::AppError;
use crate::models::reference::{DemoProperty, Season};
use std::sync::LazyLock;

static SEASONS_JSON: &str = include_str!("../../data/seasons.json");

static SEASONS: LazyLock<Result<Vec<Season>, String>> = LazyLock::new(|| serde_json::from_str(SEASONS_JSON).map_err(|e| e.to_string()));

/// Bundled seasons table, parsed on first use.
pub fn seasons() -> Result<&'static [Season], AppError> {
    match &*SEASONS {
        Ok(seasons) => Ok(seasons),
        Err(e) => Err(AppError::Internal {
            message: format!("bundled seasons data is unreadable: {}", e),
        }),
    }
}

pub fn demo_properties() -> Vec<DemoProperty> {
    vec![
        DemoProperty {
            name: "Miller Ranch North",
            notes: "Ask permission before entering.",
            coords: vec![[38.8849, -99.3281], [38.8858, -99.3251], [38.8836, -99.3239], [38.8825, -99.3276]],
        },
        DemoProperty {
            name: "State Land Unit 7-D",
            notes: "Open for archery; no firearms Nov 10-20.",
            coords: vec![[38.8895, -99.3362], [38.8907, -99.3331], [38.8883, -99.3315], [38.8872, -99.3349]],
        },
    ]
}
