pub mod config;
pub mod constants;
pub mod geometry;
pub mod layout;
pub mod types;

pub use config::*;
pub use constants::*;
pub use geometry::*;
pub use layout::*;
pub use types::*;
