//! Operation handlers grouped by resource.

pub mod access;
pub mod flavors;
