pub mod arcade;
pub mod config;
pub mod host;
pub mod input;
pub mod level;
pub mod render;
pub mod session;
pub mod sound;
pub mod term;
