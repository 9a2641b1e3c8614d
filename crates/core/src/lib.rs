pub mod enrollment;
pub mod error;
pub mod lift_max;
pub mod load_strategy;
pub mod pagination;
pub mod prescription;
pub mod progression;
pub mod roles;
pub mod rounding;
pub mod session;
pub mod set_scheme;
pub mod types;
pub mod workout;
