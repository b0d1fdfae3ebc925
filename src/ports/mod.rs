//! Ports (trait boundaries) between the learning core and its collaborators.
//!
//! The game loop only talks to opponents through [`Actor`] and reports what
//! happens through [`Observer`]; random play, human input, progress bars and
//! event logs are adapters behind these traits.

pub mod actor;
pub mod observer;

pub use actor::Actor;
pub use observer::Observer;
