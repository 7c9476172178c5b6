pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod input;
pub mod item;
pub mod logging;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
pub mod ticker;
