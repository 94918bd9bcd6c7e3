pub mod chaser;

pub use chaser::ChaserPolicy;
