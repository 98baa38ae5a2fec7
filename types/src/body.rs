/// Handle for a Keplerian body in a system's body table
pub type BodyIndex = u64;

/// Handle for a free body
pub type ShipIndex = u64;
