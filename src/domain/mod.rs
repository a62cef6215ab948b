// Domain layer - Timeline model and rules

pub mod errors;
pub mod model;
pub mod rules;
