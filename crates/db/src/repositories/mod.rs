//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Methods that must run inside a caller's
//! transaction take `&mut PgConnection` (pass `&mut *tx`) or any
//! `PgExecutor`.

pub mod enrollment_repo;
pub mod lift_max_repo;
pub mod lift_repo;
pub mod lookup_repo;
pub mod prescription_repo;
pub mod program_repo;
pub mod progression_history_repo;
pub mod progression_repo;
pub mod session_repo;
pub mod user_repo;

pub use enrollment_repo::EnrollmentRepo;
pub use lift_max_repo::LiftMaxRepo;
pub use lift_repo::LiftRepo;
pub use lookup_repo::LookupRepo;
pub use prescription_repo::PrescriptionRepo;
pub use program_repo::ProgramRepo;
pub use progression_history_repo::ProgressionHistoryRepo;
pub use progression_repo::ProgressionRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
