pub mod event;
pub mod participation;
