//! Routes: URI patterns, their compiled parts, and the match/resolve algorithms.

mod core;
mod parse;
mod part;
pub mod query;

pub use self::core::Route;
pub use part::{encode_segment, PartMatch, RoutePart, RoutePartHandler, RoutePartKind};
