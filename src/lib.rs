pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use database::store::{MemoryStore, PgStore, Store};
pub use error::AppError;

use services::{AuditRecorder, ConnectionRegistry, Dispatcher, Notifier, ShiftService, TemplateService};

/// Services shared by every request handler, built over one store backend.
pub struct AppState<S> {
    pub shifts: ShiftService<S>,
    pub templates: TemplateService<S>,
    pub notifications: Notifier<S, ConnectionRegistry>,
    pub audit: AuditRecorder<S>,
    pub realtime: ConnectionRegistry,
}

impl<S: Store> AppState<S> {
    /// Wires the services and starts the side-effect worker; must be called
    /// inside a tokio runtime.
    pub fn new(store: S, realtime: ConnectionRegistry) -> Self {
        let notifications = Notifier::new(store.clone(), realtime.clone());
        let audit = AuditRecorder::new(store.clone());
        let effects = Dispatcher::spawn(notifications.clone(), audit.clone());
        let shifts = ShiftService::new(store.clone(), effects);
        let templates = TemplateService::new(store, shifts.clone());

        Self {
            shifts,
            templates,
            notifications,
            audit,
            realtime,
        }
    }

    /// Waits for queued notifications and audit entries to be written.
    pub async fn flush_effects(&self) {
        self.shifts.effects().flush().await;
    }
}
