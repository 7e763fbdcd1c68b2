use serde::{Deserialize, Serialize};

use crate::loose;

/// Gate value marking a line that was canceled upstream.
pub const CANCELED_GATE: &str = "OUT";

/// Gate shown when no manifest line carries a usable gate.
pub const UNKNOWN_GATE: &str = "?";

/// One expected shipment line of a wave.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestItem {
    /// Unique within a wave.
    #[serde(deserialize_with = "loose::string")]
    pub barcode: String,
    #[serde(deserialize_with = "loose::string")]
    pub order_number: String,
    /// Dispatch door, or [`CANCELED_GATE`] for a system-canceled line.
    #[serde(default, deserialize_with = "loose::opt_string")]
    pub gate_number: Option<String>,
    /// Free text, usually the destination city.
    #[serde(default)]
    pub description: Option<String>,
}

impl ManifestItem {
    pub fn new(
        barcode: impl Into<String>,
        order_number: impl Into<String>,
        gate_number: Option<&str>,
    ) -> Self {
        Self {
            barcode: barcode.into(),
            order_number: order_number.into(),
            gate_number: gate_number.map(str::to_string),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns `true` if the line was canceled upstream (gate `"OUT"`).
    pub fn is_canceled(&self) -> bool {
        self.gate_number.as_deref() == Some(CANCELED_GATE)
    }

    /// The physical gate of this line, if it has one.
    pub fn gate(&self) -> Option<&str> {
        match self.gate_number.as_deref() {
            Some(CANCELED_GATE) | None => None,
            Some(gate) => Some(gate),
        }
    }
}

/// The expected shipment lines for one logistics wave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub wave_number: String,
    pub items: Vec<ManifestItem>,
    pub detected_gate: String,
}

impl Manifest {
    /// Build a manifest, detecting the gate from the first line (in the
    /// given order) that carries a real gate.
    pub fn new(wave_number: impl Into<String>, items: Vec<ManifestItem>) -> Self {
        let detected_gate = items
            .iter()
            .find_map(ManifestItem::gate)
            .unwrap_or(UNKNOWN_GATE)
            .to_string();
        Self {
            wave_number: wave_number.into(),
            items,
            detected_gate,
        }
    }

    pub fn get(&self, barcode: &str) -> Option<&ManifestItem> {
        self.items.iter().find(|item| item.barcode == barcode)
    }

    pub fn canceled_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_canceled()).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canceled_line_has_no_gate() {
        let item = ManifestItem::new("A2", "O1", Some("OUT"));
        assert!(item.is_canceled());
        assert_eq!(item.gate(), None);

        let item = ManifestItem::new("A1", "O1", Some("12"));
        assert!(!item.is_canceled());
        assert_eq!(item.gate(), Some("12"));

        let item = ManifestItem::new("A4", "O3", None);
        assert!(!item.is_canceled());
        assert_eq!(item.gate(), None);
    }

    #[test]
    fn detected_gate_skips_null_and_out() {
        let manifest = Manifest::new(
            "7",
            vec![
                ManifestItem::new("A0", "O0", None),
                ManifestItem::new("A2", "O1", Some("OUT")),
                ManifestItem::new("A1", "O1", Some("12")),
                ManifestItem::new("A3", "O2", Some("14")),
            ],
        );
        assert_eq!(manifest.detected_gate, "12");
        assert_eq!(manifest.canceled_count(), 1);
    }

    #[test]
    fn detected_gate_falls_back() {
        let manifest = Manifest::new(
            "8",
            vec![
                ManifestItem::new("B1", "O1", Some("OUT")),
                ManifestItem::new("B2", "O1", None),
            ],
        );
        assert_eq!(manifest.detected_gate, UNKNOWN_GATE);
    }

    #[test]
    fn deserializes_backend_shape() {
        let json = r#"[
            {"barcode": "A1", "orderNumber": "O1", "gateNumber": "12", "description": "Haifa"},
            {"barcode": 5501, "orderNumber": 77, "gateNumber": null},
            {"barcode": "A3", "orderNumber": "O2", "gateNumber": 9}
        ]"#;
        let items: Vec<ManifestItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].description.as_deref(), Some("Haifa"));
        assert_eq!(items[1].barcode, "5501");
        assert_eq!(items[1].order_number, "77");
        assert_eq!(items[1].gate_number, None);
        assert_eq!(items[2].gate(), Some("9"));
    }

    #[test]
    fn missing_gate_field_is_none() {
        let item: ManifestItem =
            serde_json::from_str(r#"{"barcode": "A1", "orderNumber": "O1"}"#).unwrap();
        assert_eq!(item.gate_number, None);
        assert_eq!(item.description, None);
    }

    #[test]
    fn serializes_camel_case() {
        let item = ManifestItem::new("A1", "O1", Some("12")).with_description("Haifa");
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["orderNumber"], "O1");
        assert_eq!(value["gateNumber"], "12");
        assert_eq!(value["description"], "Haifa");
    }
}
