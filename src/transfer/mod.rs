pub mod mode;
pub mod texels;
