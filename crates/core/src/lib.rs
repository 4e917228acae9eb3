#![forbid(unsafe_code)]

pub mod error;
pub mod markup;
pub mod model;
pub mod template;
pub mod time;

pub use error::Error;
pub use time::Clock;
