//! Application state and its single owner.
//!
//! * **`model`**: plain data: [`AppState`], [`Source`], [`Post`] and friends.
//! * **`store`**: [`Store`], the only mutation route, and the [`Change`]
//!   events it raises for its [`Observer`].

mod model;
mod store;

pub use model::{AppState, OutOfBandError, Post, PostId, ProcessState, Source, SourceId, Update};
pub use store::{Change, Observer, Store};
