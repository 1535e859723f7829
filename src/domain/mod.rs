//! Mountain records and the two collections built on the tables: a manager grouping mountains
//! by difficulty, and an organiser ranking them by name.

pub mod manager;
pub mod mountain;
pub mod organiser;

pub use manager::MountainManager;
pub use mountain::Mountain;
pub use organiser::MountainOrganiser;
