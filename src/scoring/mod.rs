// Pairwise scoring — set intersection, composite similarity, insights.
//
// All three stages are pure, synchronous functions: no I/O, no shared state.

pub mod insights;
pub mod intersect;
pub mod similarity;
