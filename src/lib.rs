//! A side-scrolling pipe dodger.
//!
//! The simulation (`game`, `physics`, `spawner`, `geometry`) knows nothing
//! about terminals. The host in `main.rs` drives it with a frame loop and a
//! spawn timer, and plugs in the terminal canvas, rodio sound and a JSON
//! high-score file.

pub mod audio;
pub mod config;
pub mod game;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod physics;
pub mod pixels;
pub mod render;
pub mod spawner;
pub mod storage;
pub mod timer;
pub mod types;
