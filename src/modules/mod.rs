pub mod stats;
pub mod system;
