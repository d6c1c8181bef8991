//! Form domain layer
//!
//! Field declarations, the monitoring tool schema and the live form state.

mod field;
mod form_state;
pub mod monitoring;
mod schema;

pub use field::{is_iso_date, is_numeric, FieldKind, FieldValue, FormField, DATE_FORMAT};
pub use form_state::{FieldError, MonitoringForm};
pub use schema::{FieldDecl, FormSchema, SchemaError, SectionDecl};
