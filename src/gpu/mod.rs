pub(crate) mod backend;
pub mod device;
pub(crate) mod program;
pub(crate) mod texture;
