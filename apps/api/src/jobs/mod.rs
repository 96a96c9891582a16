// Job aggregation: live search against the external provider, normalized
// into a uniform listing shape and cached in Redis, plus the applications
// that join a user to a listing.

pub mod cache;
pub mod handlers;
pub mod provider;
