pub mod errors;
pub mod events;
pub mod returning;
pub mod room;
pub mod word_validation;

// Re-export main components
pub use errors::*;
pub use events::*;
pub use returning::*;
pub use room::*;
pub use word_validation::*;
