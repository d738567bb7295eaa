pub mod audit;
pub mod availability;
pub mod dispatcher;
pub mod notifier;
pub mod realtime;
pub mod shift_service;
pub mod template_service;

pub use audit::{AuditRecord, AuditRecorder};
pub use dispatcher::Dispatcher;
pub use notifier::{Notice, Notifier};
pub use realtime::{ConnectionRegistry, RealtimeEvent, RealtimeTransport};
pub use shift_service::{Actor, ShiftService};
pub use template_service::TemplateService;
