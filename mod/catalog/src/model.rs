use serde::{Deserialize, Serialize};

use tinta_core::{HasIdleFlag, HasNotes};

/// One catalog record: materials, services, rooms, room parts, and the
/// auxiliary reference tables (contact types, statuses, unit measures)
/// all share this shape. `code` is only carried by unit measures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub idle: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CatalogItem {
    /// Display label: `name`, or `name (code)` when a code is present.
    pub fn display(&self) -> String {
        match &self.code {
            Some(code) if !code.is_empty() => format!("{} ({})", self.name, code),
            _ => self.name.clone(),
        }
    }
}

impl HasIdleFlag for CatalogItem {
    fn idle(&self) -> bool {
        self.idle
    }
}

impl HasNotes for CatalogItem {
    fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_code_when_present() {
        let unit = CatalogItem {
            id: "u1".into(),
            name: "Metro Quadrado".into(),
            code: Some("m²".into()),
            idle: false,
            notes: None,
        };
        assert_eq!(unit.display(), "Metro Quadrado (m²)");

        let material = CatalogItem { name: "Tinta".into(), ..Default::default() };
        assert_eq!(material.display(), "Tinta");
    }
}
