use serde::{Deserialize, Serialize};

use tinta_core::{HasIdleFlag, HasNotes};

/// Legal person kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonType {
    /// Pessoa Física.
    #[default]
    #[serde(rename = "F")]
    Fisica,
    /// Pessoa Jurídica.
    #[serde(rename = "J")]
    Juridica,
}

impl PersonType {
    pub fn display(self) -> &'static str {
        match self {
            PersonType::Fisica => "Pessoa Física",
            PersonType::Juridica => "Pessoa Jurídica",
        }
    }
}

/// Client master record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub id: String,

    /// Nome / Razão Social. Stored folded to uppercase ASCII.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fantasy_name: Option<String>,

    #[serde(default)]
    pub person_type: PersonType,

    /// Document number (CPF or CNPJ), digits only. Unique when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf_cnpj: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rg_ie: Option<String>,

    #[serde(default)]
    pub idle: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One address of a client. Owned by the client (cascade); the city
/// reference is protected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientAddress {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub client_id: String,
    pub city_id: String,
    pub zip_code: String,
    pub street: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub district: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One contact entry of a client (phone, email, ...). The contact type
/// reference is protected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientContact {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub client_id: String,
    pub contact_type_id: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HasIdleFlag for Client {
    fn idle(&self) -> bool {
        self.idle
    }
}

impl HasNotes for Client {
    fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

impl HasNotes for ClientAddress {
    fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

impl HasNotes for ClientContact {
    fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}
