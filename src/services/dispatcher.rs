//! Background execution of notification and audit side effects.
//!
//! Lifecycle operations enqueue effects after their transaction commits and
//! return without waiting. A single worker task drains the queue in order;
//! a failing effect is logged and the worker moves on.

use tokio::sync::{mpsc, oneshot};

use crate::database::store::{AuditStore, NotificationStore};
use crate::services::audit::{AuditRecord, AuditRecorder};
use crate::services::notifier::{Notice, Notifier};
use crate::services::realtime::RealtimeTransport;

#[derive(Debug)]
enum Effect {
    Notify(Notice),
    Audit(AuditRecord),
    Flush(oneshot::Sender<()>),
}

/// Cheap to clone; every clone feeds the same worker.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Effect>,
}

impl Dispatcher {
    /// Starts the worker on the current tokio runtime.
    pub fn spawn<N, T, A>(notifier: Notifier<N, T>, recorder: AuditRecorder<A>) -> Self
    where
        N: NotificationStore,
        T: RealtimeTransport,
        A: AuditStore,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(effect) = rx.recv().await {
                match effect {
                    Effect::Notify(notice) => {
                        if let Err(e) = notifier.notify(&notice).await {
                            log::warn!(
                                "Failed to deliver '{}' notification to {}: {}",
                                notice.event,
                                notice.recipient_id,
                                e
                            );
                        }
                    }
                    Effect::Audit(record) => {
                        if let Err(e) = recorder.record(&record).await {
                            log::warn!(
                                "Failed to write audit entry {} by {}: {}",
                                record.action,
                                record.admin_id,
                                e
                            );
                        }
                    }
                    Effect::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            log::info!("Side-effect dispatcher stopped");
        });

        Self { tx }
    }

    pub fn notify(&self, notice: Notice) {
        if self.tx.send(Effect::Notify(notice)).is_err() {
            log::warn!("Side-effect dispatcher is gone; notification dropped");
        }
    }

    pub fn audit(&self, record: AuditRecord) {
        if self.tx.send(Effect::Audit(record)).is_err() {
            log::warn!("Side-effect dispatcher is gone; audit entry dropped");
        }
    }

    /// Resolves once every effect enqueued before this call has run.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Effect::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }
}
