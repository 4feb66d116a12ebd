//! Veilwatch - stealth detection and guard AI core
//!
//! Guards sense the player and feed one shared detection meter; a full meter
//! alerts the source guard's group. A world-mode switch sends every guard
//! into the spirit world, where lures pull them around instead.

pub mod alert;
pub mod core;
pub mod detection;
pub mod guard;
pub mod lure;
pub mod scenario;
pub mod simulation;
pub mod spatial;
pub mod world;
