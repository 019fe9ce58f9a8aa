pub mod chat;
pub mod user;

pub use chat::{ChatTurn, Role, Transcript, TurnState, GREETING};
pub use user::UserProfile;
