//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Writes take `&mut PgConnection` so they can run inside a caller-owned
//! transaction; reads take `&PgPool`.

pub mod actor_repo;
pub mod movie_repo;

pub use actor_repo::ActorRepo;
pub use movie_repo::MovieRepo;
