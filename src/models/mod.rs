//! Core data models for championships.

mod championship;
mod fixture;
mod ids;
mod standings;
mod team;
pub mod wire;

pub use championship::*;
pub use fixture::*;
pub use ids::*;
pub use standings::*;
pub use team::*;
