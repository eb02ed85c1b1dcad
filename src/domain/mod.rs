//! Domain types and marketplace rules
//!
//! Entity types and form DTOs, plus the pure decision modules: role policy,
//! feed filtering, rating display aggregation and contact links.

pub mod contact;
pub mod feed;
pub mod lots;
pub mod policy;
pub mod prices;
pub mod ratings;
pub mod reputation;
pub mod service_listings;
pub mod service_type;
pub mod users;
pub mod work_requests;
