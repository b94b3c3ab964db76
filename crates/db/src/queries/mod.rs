pub mod media;
pub mod polls;
pub mod reports;
pub mod sessions;
pub mod views;
