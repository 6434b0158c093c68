// Player identity and position types shared by every table.

pub mod identity;
pub mod position;

pub use identity::PlayerIdentity;
pub use position::Position;
