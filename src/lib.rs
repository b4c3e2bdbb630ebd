// Tastematch: music taste comparison between two streaming accounts
//
// This is the library root. Each module corresponds to one stage of the
// comparison pipeline or one of its outer surfaces.

pub mod catalog;
pub mod config;
pub mod error;
pub mod features;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod scoring;

#[cfg(feature = "web")]
pub mod web;
