use serde::{Deserialize, Serialize};

use tinta_core::HasNotes;

/// Order / quote header. References to client and status are protected;
/// display labels are denormalized onto the record at save time so
/// listings and detail views need no joins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: String,

    pub client_id: String,
    #[serde(default)]
    pub client_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Lead time in days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time: Option<i64>,

    pub status_id: String,
    #[serde(default)]
    pub status_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One material line of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderMaterial {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub order_id: String,
    pub material_id: String,
    #[serde(default)]
    pub material_name: String,
    pub unit_measure_id: String,
    #[serde(default)]
    pub unit_label: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One service line of an order: a service applied to a part of a room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderService {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub order_id: String,
    pub service_id: String,
    #[serde(default)]
    pub service_name: String,
    pub room_id: String,
    #[serde(default)]
    pub room_name: String,
    pub room_part_id: String,
    #[serde(default)]
    pub room_part_name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HasNotes for Order {
    fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

impl HasNotes for OrderMaterial {
    fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

impl HasNotes for OrderService {
    fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_json_roundtrip() {
        let o = Order {
            id: "o1".into(),
            client_id: "c1".into(),
            client_name: "ANA SILVA".into(),
            issue_date: Some("2025-03-01".into()),
            due_date: None,
            lead_time: Some(15),
            status_id: "s1".into(),
            status_name: "Pendente".into(),
            notes: None,
        };
        let json = serde_json::to_string(&o).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(o, back);
    }
}
