//! Bike-share rebalancing server.
//!
//! A web service that answers two questions for the people moving bikes
//! around a city: "which stations are too full or too empty right now?"
//! and "how do I get from this one to that one?"

pub mod cache;
pub mod classify;
pub mod config;
pub mod domain;
pub mod feed;
pub mod graph;
pub mod planner;
pub mod web;
