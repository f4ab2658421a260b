//! API data models
//!
//! This module contains the image generation request shapes.

pub mod generation;
