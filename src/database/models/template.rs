use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DayOfWeek {
        Sunday => "sunday",
        Monday => "monday",
        Tuesday => "tuesday",
        Wednesday => "wednesday",
        Thursday => "thursday",
        Friday => "friday",
        Saturday => "saturday",
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Sunday => Weekday::Sun,
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
        }
    }
}

string_enum! {
    /// How often the rota repeats the template. Stored for planners; shift
    /// generation works one date at a time and never consults it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Recurrence {
        #[default]
        Weekly => "weekly",
        Biweekly => "biweekly",
        Monthly => "monthly",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TemplateStatus {
        #[default]
        Active => "active",
        Inactive => "inactive",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTemplate {
    pub id: Uuid,
    pub client_id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub day_of_week: DayOfWeek,
    /// Informational; see [`Recurrence`].
    pub recurrence: Recurrence,
    pub status: TemplateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShiftTemplate {
    /// The UTC window this template describes on `date`. An end time at or
    /// before the start time rolls over to the following day.
    pub fn window_on(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = date.and_time(self.start_time).and_utc();
        let mut end = date.and_time(self.end_time).and_utc();
        if end <= start {
            end += Duration::days(1);
        }
        (start, end)
    }

    pub fn falls_on(&self, date: NaiveDate) -> bool {
        date.weekday() == Weekday::from(self.day_of_week)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTemplateInput {
    pub client_id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub day_of_week: DayOfWeek,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub status: TemplateStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateShiftInput {
    pub date: NaiveDate,
}
