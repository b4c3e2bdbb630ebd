// Catalog access — where listening data comes from.
//
// The CatalogProvider trait is the only seam the comparison pipeline sees.
// SpotifyCatalog talks to the Spotify Web API; FixtureCatalog serves canned
// users from a JSON file for offline runs and demos.

pub mod fixture;
pub mod spotify;
pub mod tokens;
pub mod traits;
