pub mod event_repo;
pub mod participation_repo;

pub use event_repo::EventRepo;
pub use participation_repo::ParticipationRepo;
