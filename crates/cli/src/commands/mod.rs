pub mod extract;
pub mod render;
pub mod syscalls;

pub use extract::*;
pub use render::*;
pub use syscalls::*;
