// HTTP handlers, one module per resource.

pub mod compare;
pub mod profile;
