pub mod audit;
pub(crate) mod macros;
pub mod notification;
pub mod shift;
pub mod template;

// Re-export all models for easy importing
pub use audit::*;
pub use notification::*;
pub use shift::*;
pub use template::*;
