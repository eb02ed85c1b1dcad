//! Data access against the hosted Postgres database
//!
//! Each module owns the SQL and the row types for one collection, and turns
//! joined rows into the fixed domain shapes (a missing join becomes `None`)
//! before anything else sees them.

pub mod lots;
pub mod prices;
pub mod ratings;
pub mod service_listings;
pub mod users;
pub mod work_requests;
