//! Heritage mesh viewer core.
//!
//! Distance measurement on scanned cultural-heritage meshes: click tools over
//! a displayed mesh, scaled to real-world units against a user-supplied
//! reference length.

pub mod app;
pub mod host;
pub mod scene;
pub mod tools;
pub mod ui;
pub mod units;
