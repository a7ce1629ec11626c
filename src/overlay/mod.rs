pub mod directory;
pub mod layout;
pub mod wasm;

pub use directory::*;
pub use layout::*;
pub use wasm::*;
