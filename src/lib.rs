pub mod config;
pub mod logging;

pub mod meter;
pub mod observer;
pub mod progress;
pub mod stats;
pub mod track;

mod window;
