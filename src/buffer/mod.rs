pub mod capacity;
pub mod logical;
