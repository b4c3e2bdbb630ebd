// Audio features — the fixed feature set and per-user aggregation.

pub mod extract;
pub mod vector;
