// Pipelines — the async workflows that tie catalog access to scoring.

pub mod compare;
