//! cardsmith - Library for rendering creature trading cards
//!
//! This library provides functionality to:
//! - Render 750x1050 standard and shining cards and 300x450 legacy cards
//! - Fetch sprite artwork over HTTP or from a local directory
//! - Build marketplace metadata sidecars for every card
//! - Drive whole rosters from JSON fixtures

pub mod artwork;
pub mod blend;
pub mod card;
pub mod cli;
pub mod color;
pub mod config;
pub mod effects;
pub mod fonts;
pub mod layout;
pub mod metadata;
pub mod models;
pub mod output;
pub mod palette;
pub mod progress;
pub mod roster;
pub mod shapes;
pub mod text;
