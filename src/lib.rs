// canvasfit: profile-driven photo compositor library

pub mod codec;
pub mod compose;
pub mod config;
pub mod logging;
pub mod watermark;
