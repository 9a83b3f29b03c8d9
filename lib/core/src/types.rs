/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

// ── Field-set traits ────────────────────────────────────────────────
//
// Records declare the field sets they carry by implementing these;
// normalization and presentation code dispatches on trait presence.

/// Records with a free-text notes field.
pub trait HasNotes {
    fn notes(&self) -> Option<&str>;
}

/// Records with an active/inactive flag.
pub trait HasIdleFlag {
    fn idle(&self) -> bool;
}

/// "Ativo"/"Inativo" label for any record carrying the idle flag.
pub fn idle_status_label<R: HasIdleFlag>(record: &R) -> &'static str {
    if record.idle() { "Inativo" } else { "Ativo" }
}
