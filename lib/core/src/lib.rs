pub mod config;
pub mod error;
pub mod http;
pub mod module;
pub mod text;
pub mod types;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use http::wants_fragment;
pub use module::Module;
pub use types::{HasIdleFlag, HasNotes, idle_status_label, new_id, now_rfc3339};
