//! Route planner.
//!
//! Answers "how do I get from this point to that one by bike (or by van)?"
//! over the pre-built graphs. Used to move bikes from overloaded stations to
//! underfed ones.

mod route;

pub use route::{Route, RouteError, RoutePlanner, RouteQuery};
