//! Database entity definitions.

pub mod application;
pub mod official;

pub use application::ApplicationEntity;
pub use official::OfficialEntity;
