//! Domain aggregates exposed by the portal service layer.

pub mod assignment;
pub mod client;
pub mod document;
pub mod feedback;
pub mod types;
pub mod work_log;
