mod retry;
mod controller;
mod background;

pub use background::BackgroundStreamer;
pub use controller::{StreamReport, StreamingController};
