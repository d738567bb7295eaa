use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::models::{
    AuditAction, CreateShiftInput, Shift, ShiftTemplate, ShiftTemplateInput, TemplateStatus,
};
use crate::database::store::Store;
use crate::error::AppError;
use crate::services::shift_service::{Actor, ShiftService};

/// Weekly shift patterns for a client. Generating from a template goes
/// through [`ShiftService::create`], so generated shifts obey the same rules
/// as hand-made ones.
#[derive(Clone)]
pub struct TemplateService<S> {
    store: S,
    shifts: ShiftService<S>,
}

impl<S: Store> TemplateService<S> {
    pub fn new(store: S, shifts: ShiftService<S>) -> Self {
        Self { store, shifts }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        input: ShiftTemplateInput,
    ) -> Result<ShiftTemplate, AppError> {
        if input.start_time == input.end_time {
            return Err(AppError::BadRequest(
                "Template start and end times must differ".to_string(),
            ));
        }
        if !self.store.template_client_exists(input.client_id).await? {
            return Err(AppError::not_found("Client", input.client_id));
        }

        let template = self.store.insert_template(&input).await?;
        log::info!("Shift template {} created by {}", template.id, actor.id);

        self.shifts.effects().audit(actor.audit(
            AuditAction::CREATE_TEMPLATE,
            format!(
                "Created {} template {} for client {}",
                template.day_of_week, template.id, template.client_id
            ),
        ));

        Ok(template)
    }

    pub async fn list(&self, client_id: Option<Uuid>) -> Result<Vec<ShiftTemplate>, AppError> {
        Ok(self.store.list_templates(client_id).await?)
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_template(id).await? {
            return Err(AppError::not_found("Shift template", id));
        }
        log::info!("Shift template {} deleted by {}", id, actor.id);

        self.shifts.effects().audit(actor.audit(
            AuditAction::DELETE_TEMPLATE,
            format!("Deleted template {}", id),
        ));
        Ok(())
    }

    /// Creates a pending shift for the template's window on `date`.
    ///
    /// Any date on the template's weekday is accepted whatever its
    /// recurrence; the caller picks which weeks to staff.
    pub async fn generate(&self, actor: &Actor, id: Uuid, date: NaiveDate) -> Result<Shift, AppError> {
        let template = self
            .store
            .get_template(id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift template", id))?;

        if template.status != TemplateStatus::Active {
            return Err(AppError::BadRequest(format!(
                "Shift template {} is inactive",
                id
            )));
        }
        if !template.falls_on(date) {
            return Err(AppError::BadRequest(format!(
                "{} is not a {}",
                date, template.day_of_week
            )));
        }

        let (start_time, end_time) = template.window_on(date);
        self.shifts
            .create(
                actor,
                CreateShiftInput {
                    client_id: template.client_id,
                    staff_id: None,
                    start_time,
                    end_time,
                },
            )
            .await
    }
}
