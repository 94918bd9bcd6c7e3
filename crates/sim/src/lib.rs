pub mod bullet;
pub mod collision;
pub mod error;
pub mod match_loop;
pub mod observation;
pub mod opponents;
pub mod physics;
pub mod policy;
pub mod robot;
pub mod zones;

pub use error::SimError;
pub use match_loop::*;
pub use observation::progress_reward;
pub use physics::*;
pub use policy::*;
