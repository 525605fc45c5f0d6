use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Option<String>,
    pub name: Option<String>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub license_plate: Option<String>,
    /// Always within 0..=100 when present.
    pub battery_percent: Option<u8>,
    pub capacity: Option<f64>,
    pub condition: Option<String>,
    pub issue_description: Option<String>,
    pub station_id: Option<String>,
    pub station_name: Option<String>,
    pub image_url: Option<String>,
}

impl Vehicle {
    /// `name`, else `brand model`.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        let composed = [self.brand.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        (!composed.is_empty()).then_some(composed)
    }
}
