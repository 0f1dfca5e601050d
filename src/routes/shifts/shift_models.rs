use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::shift::Shift;

// Shift as returned to clients: viewed_by parsed to an id list.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftResponse {
    pub id: String,
    pub employee_id: Option<String>,
    pub employee_name: Option<String>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    #[serde(rename = "type")]
    pub shift_type: String,
    pub notes: Option<String>,
    pub status: String,
    pub viewed_by: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Shift> for ShiftResponse {
    fn from(shift: Shift) -> Self {
        let viewed_by = shift
            .viewed_by
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();
        Self {
            id: shift.id,
            employee_id: shift.employee_id,
            employee_name: shift.employee_name,
            date: shift.date,
            start_time: shift.start_time,
            end_time: shift.end_time,
            location: shift.location,
            shift_type: shift.shift_type,
            notes: shift.notes,
            status: shift.status,
            viewed_by,
            created_at: shift.created_at,
        }
    }
}

// Create request and response
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftRequest {
    pub id: Option<String>,
    pub employee_id: Option<String>,
    pub employee_name: Option<String>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    #[serde(rename = "type")]
    pub shift_type: String,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub viewed_by: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct CreateShiftResponse {
    pub success: bool,
    pub id: String,
}

// Update request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftRequest {
    pub employee_id: Option<String>,
    pub employee_name: Option<String>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    #[serde(rename = "type")]
    pub shift_type: String,
    pub notes: Option<String>,
    pub status: String,
    pub viewed_by: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct ShiftMutationResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_viewed_by_and_renames_type() {
        let shift = Shift {
            id: "shift-1".into(),
            employee_id: Some("user-1".into()),
            employee_name: Some("Marvin".into()),
            date: "2024-05-06".into(),
            start_time: "08:00".into(),
            end_time: "16:00".into(),
            location: "Depot Ost".into(),
            shift_type: "Frühdienst".into(),
            notes: None,
            status: "geplant".into(),
            viewed_by: Some(r#"["user-1","user-2"]"#.into()),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(ShiftResponse::from(shift)).unwrap();
        assert_eq!(value["type"], "Frühdienst");
        assert_eq!(value["viewedBy"], serde_json::json!(["user-1", "user-2"]));
        assert!(value.get("shiftType").is_none());
    }

    #[test]
    fn malformed_viewed_by_falls_back_to_empty_list() {
        let shift = Shift {
            id: "shift-1".into(),
            employee_id: None,
            employee_name: None,
            date: "2024-05-06".into(),
            start_time: "08:00".into(),
            end_time: "16:00".into(),
            location: "Depot Ost".into(),
            shift_type: "Spätdienst".into(),
            notes: None,
            status: "geplant".into(),
            viewed_by: Some("not json".into()),
            created_at: Utc::now(),
        };

        assert!(ShiftResponse::from(shift).viewed_by.is_empty());
    }
}
