//! DTO modules that bridge services with templates and APIs.

pub mod assignments;
pub mod feedback;
pub mod work_logs;
