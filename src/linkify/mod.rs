pub mod filters;
pub mod bulk;
pub mod selection;
pub mod messages;
pub mod host;
pub mod dispatch;
#[cfg(target_arch = "wasm32")]
pub mod cortex;

pub use filters::*;
pub use bulk::*;
pub use selection::*;
pub use messages::*;
pub use host::*;
pub use dispatch::*;
#[cfg(target_arch = "wasm32")]
pub use cortex::*;

#[cfg(test)]
mod tests;
