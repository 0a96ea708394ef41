//! Client for the booking backend's REST API.
//!
//! Only the server half of the app talks to the backend; the browser goes
//! through the server functions in `pages`. One client is built at startup
//! from [`Settings`] and shared.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::{header, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::booking::NewReservation;
use super::installation::Installation;
use super::shared_booking::{
    BackendErrorBody, DailyAvailability, LoginRequest, LoginResponse, RegisterRequest,
    ReservationRecord,
};
use crate::error::{ApiError, Result};
use crate::settings::Settings;

const GENERIC_ERROR: &str = "Error en la petición";

static API_CLIENT: OnceLock<ApiClient> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.api_base_url,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    /// Installs the process-wide client. Later calls are ignored.
    pub fn install(client: ApiClient) {
        if API_CLIENT.set(client).is_err() {
            log::warn!("API client already installed, keeping the first one");
        }
    }

    pub fn global() -> Result<&'static ApiClient> {
        API_CLIENT.get().ok_or(ApiError::NotConfigured)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match token.filter(|t| !t.is_empty()) {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Option<T>> {
        let response = builder.send().await?;
        let status = response.status();
        log::debug!("{} <- {}", status, response.url());

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message: backend_error_message(&raw),
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }

    async fn send_expecting<T: DeserializeOwned + Default>(&self, builder: RequestBuilder) -> Result<T> {
        Ok(self.send(builder).await?.unwrap_or_default())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let builder = self.request(Method::POST, "/users/login", None).json(&body);
        self.send(builder).await?.ok_or_else(|| ApiError::Backend {
            status: StatusCode::NO_CONTENT.as_u16(),
            message: "Error al iniciar sesión".to_string(),
        })
    }

    /// Creates the account. The backend answers with the same shape as a
    /// login, token included.
    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse> {
        let builder = self.request(Method::POST, "/users/register", None).json(request);
        self.send(builder).await?.ok_or_else(|| ApiError::Backend {
            status: StatusCode::NO_CONTENT.as_u16(),
            message: "No se ha podido completar el registro.".to_string(),
        })
    }

    pub async fn installations(&self, token: Option<&str>) -> Result<Vec<Installation>> {
        let builder = self.request(Method::GET, "/installations", token);
        self.send_expecting(builder).await
    }

    pub async fn daily_availability(
        &self,
        token: Option<&str>,
        installation_id: i64,
        date: &str,
    ) -> Result<DailyAvailability> {
        let path = format!(
            "/reservations/availability?{}",
            query(&[("installationId", installation_id.to_string()), ("date", date.to_string())])
        );
        let builder = self.request(Method::GET, &path, token);
        self.send_expecting(builder).await
    }

    pub async fn create_reservation(
        &self,
        token: Option<&str>,
        reservation: &NewReservation,
    ) -> Result<Option<ReservationRecord>> {
        let builder = self.request(Method::POST, &create_reservation_path(reservation), token);
        self.send(builder).await
    }

    pub async fn user_reservations(
        &self,
        token: Option<&str>,
        user_id: i64,
    ) -> Result<Vec<ReservationRecord>> {
        let builder = self.request(Method::GET, &format!("/reservations/user/{user_id}"), token);
        self.send_expecting(builder).await
    }

    pub async fn cancel_reservation(
        &self,
        token: Option<&str>,
        reservation_id: i64,
        user_id: i64,
    ) -> Result<Option<ReservationRecord>> {
        let path = format!(
            "/reservations/{reservation_id}/cancel?{}",
            query(&[("userId", user_id.to_string()), ("admin", "false".to_string())])
        );
        let builder = self.request(Method::POST, &path, token);
        self.send(builder).await
    }
}

fn query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn create_reservation_path(reservation: &NewReservation) -> String {
    format!(
        "/reservations?{}",
        query(&[
            ("userId", reservation.user_id.to_string()),
            ("installationId", reservation.installation_id.to_string()),
            ("start", reservation.start.clone()),
            ("duration", reservation.duration_minutes.to_string()),
        ])
    )
}

/// What to show the user for a failed call: the JSON `message` or `error`
/// field, else the plain body, else a generic text.
pub fn backend_error_message(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return GENERIC_ERROR.to_string();
    }
    match serde_json::from_str::<BackendErrorBody>(raw) {
        Ok(body) => body
            .message
            .or(body.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_ERROR.to_string()),
        Err(_) => raw.to_string(),
    }
}
