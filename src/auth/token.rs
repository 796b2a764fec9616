//! Access token record models.

pub mod record;
