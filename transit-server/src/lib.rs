//! Transit network server.
//!
//! Loads a bus timetable (stops, trips, stop visits), answers "how do I get
//! from this station to that one with the fewest hops", and simulates bus
//! arrivals and passenger wait times over a service day.

pub mod cache;
pub mod config;
pub mod domain;
pub mod planner;
pub mod schedule;
pub mod simulation;
pub mod web;
