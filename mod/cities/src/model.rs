use serde::{Deserialize, Serialize};

use tinta_core::{HasIdleFlag, HasNotes};

/// State / federative unit. PK = stable registry (IBGE) id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uf {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    #[serde(default)]
    pub idle: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// City. PK = stable registry (IBGE) id.
///
/// The UF abbreviation is denormalized onto the record at import time so
/// the display label needs no join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub uf_id: String,
    pub uf_abbreviation: String,
    #[serde(default)]
    pub idle: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HasIdleFlag for Uf {
    fn idle(&self) -> bool {
        self.idle
    }
}

impl HasNotes for Uf {
    fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

impl HasIdleFlag for City {
    fn idle(&self) -> bool {
        self.idle
    }
}

impl HasNotes for City {
    fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_json_roundtrip() {
        let c = City {
            id: "3106200".into(),
            name: "Belo Horizonte".into(),
            uf_id: "31".into(),
            uf_abbreviation: "MG".into(),
            idle: false,
            notes: None,
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: City = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
