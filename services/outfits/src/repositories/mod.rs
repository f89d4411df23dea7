//! Repositories for database operations

pub mod like;
pub mod outfit;
pub mod session;
pub mod user;

pub use like::LikeRepository;
pub use outfit::OutfitRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

/// Whether an error raised by a repository is a unique constraint violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}
