//! Outfit service models

pub mod item;
pub mod like;
pub mod outfit;
pub mod session;
pub mod user;

// Re-export for convenience
pub use item::ClothingItem;
pub use like::{Like, LikeStatus};
pub use outfit::{NewOutfit, Outfit, OutfitSummary};
pub use session::{NewSession, Session};
pub use user::{NewUser, PublicUser, User, UserResponse};
