//! REST API endpoint modules.

pub mod github;
pub mod save;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;
