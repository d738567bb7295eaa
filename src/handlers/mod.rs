pub mod audit;
pub mod notifications;
pub mod shared;
pub mod shifts;
pub mod templates;
