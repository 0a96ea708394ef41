//! Wire records exchanged with the booking backend.
//!
//! These mirror the JSON the backend emits, field names and all. Nothing in
//! here is interpreted: [`crate::data::slots`], [`crate::data::reservation`]
//! and [`crate::data::installation`] normalize them into the records the
//! rest of the crate works with.

use serde::{Deserialize, Serialize};

/// One entry of `GET /reservations/availability`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotRecord {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAvailability {
    #[serde(default)]
    pub installation_id: Option<i64>,
    #[serde(default)]
    pub installation_name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub slots: Vec<TimeSlotRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub installation_id: Option<i64>,
    #[serde(default)]
    pub installation_name: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    /// BigDecimal on the backend; arrives as a JSON number or string.
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub nombre: String,
    pub apellido: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub rol: Option<String>,
    pub token: String,
    #[serde(default)]
    pub nombre: Option<String>,
}

/// Error body the backend returns on non-2xx responses, when it is JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_tolerates_nulls_and_missing_fields() {
        let raw = r#"{
            "installationId": 3,
            "installationName": "Pista 1",
            "date": "2024-01-01",
            "slots": [
                {"start": "2024-01-01T08:00", "end": "2024-01-01T08:30", "status": "DISPONIBLE", "reason": null},
                {"start": "08:30", "end": "09:00"}
            ]
        }"#;

        let parsed: DailyAvailability = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.installation_id, Some(3));
        assert_eq!(parsed.slots.len(), 2);
        assert_eq!(parsed.slots[1].status, None);
    }

    #[test]
    fn register_body_uses_backend_field_names() {
        let body = serde_json::to_value(RegisterRequest {
            email: "ana@example.org".into(),
            password: "secreto".into(),
            nombre: "Ana".into(),
            apellido: "Gil".into(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "email": "ana@example.org",
                "password": "secreto",
                "nombre": "Ana",
                "apellido": "Gil"
            })
        );

        let created: LoginResponse = serde_json::from_str(
            r#"{"id": 9, "email": "ana@example.org", "rol": "USER",
                "message": "Usuario registrado correctamente", "token": "t", "nombre": "Ana"}"#,
        )
        .unwrap();
        assert_eq!(created.token, "t");
        assert_eq!(created.nombre.as_deref(), Some("Ana"));
    }

    #[test]
    fn reservation_amount_keeps_raw_json() {
        let raw = r#"{"id": 7, "amount": 4.5, "status": "CONFIRMED"}"#;
        let parsed: ReservationRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.amount, Some(serde_json::json!(4.5)));
        assert_eq!(parsed.start, None);
    }
}
