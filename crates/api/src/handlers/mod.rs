pub mod enrollment;
pub mod maxes;
pub mod prescriptions;
pub mod progressions;
pub mod sessions;
pub mod workout;
