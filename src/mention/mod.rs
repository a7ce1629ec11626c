pub mod config;
pub mod grammar;
pub mod offsets;
pub mod scanner;
pub mod policy;
pub mod guard;
pub mod editor;
pub mod wasm;

pub use config::*;
pub use scanner::*;
pub use policy::*;
pub use guard::*;
pub use editor::*;
pub use wasm::*;

#[cfg(test)]
mod tests;
