//! Server functions the pages call. Each one forwards to the booking
//! backend through the shared [`ApiClient`](crate::data::api::ApiClient)
//! and passes the backend's error text through unchanged.

use leptos::prelude::*;
use leptos::server_fn::error::NoCustomError;

use crate::data::booking::NewReservation;
use crate::data::installation::Installation;
use crate::data::shared_booking::{DailyAvailability, LoginResponse, RegisterRequest, ReservationRecord};

#[cfg(feature = "ssr")]
fn server_error(e: impl std::fmt::Display) -> ServerFnError {
    ServerFnError::<NoCustomError>::ServerError(e.to_string())
}

#[server(Login)]
pub async fn login(email: String, password: String) -> Result<LoginResponse, ServerFnError> {
    use crate::data::api::ApiClient;

    let client = ApiClient::global().map_err(server_error)?;
    client.login(email.trim(), password.trim()).await.map_err(|e| {
        log::info!("login rejected for {}: {}", email, e);
        server_error(e)
    })
}

/// Registers the account, then logs in with the same credentials so the
/// browser gets a fresh session.
#[server(Register)]
pub async fn register(request: RegisterRequest) -> Result<LoginResponse, ServerFnError> {
    use crate::data::api::ApiClient;

    let client = ApiClient::global().map_err(server_error)?;
    let request = RegisterRequest {
        email: request.email.trim().to_string(),
        nombre: request.nombre.trim().to_string(),
        apellido: request.apellido.trim().to_string(),
        ..request
    };
    client.register(&request).await.map_err(|e| {
        log::info!("registration rejected for {}: {}", request.email, e);
        server_error(e)
    })?;
    log::info!("registered {}", request.email);

    client
        .login(&request.email, &request.password)
        .await
        .map_err(|e| {
            log::warn!("automatic login after registering {} failed: {}", request.email, e);
            server_error(
                "La cuenta se creó correctamente, pero no se pudo iniciar sesión automáticamente. \
                 Prueba a iniciar sesión desde la pantalla de acceso.",
            )
        })
}

#[server(GetInstallations)]
pub async fn get_installations(token: Option<String>) -> Result<Vec<Installation>, ServerFnError> {
    use crate::data::api::ApiClient;

    let client = ApiClient::global().map_err(server_error)?;
    client
        .installations(token.as_deref())
        .await
        .map_err(server_error)
}

#[server(GetDailyAvailability)]
pub async fn get_daily_availability(
    token: Option<String>,
    installation_id: i64,
    date: String,
) -> Result<DailyAvailability, ServerFnError> {
    use crate::data::api::ApiClient;

    if crate::utils::date::parse_date(&date).is_none() {
        return Err(ServerFnError::<NoCustomError>::Args(format!("invalid date '{date}'")));
    }
    let client = ApiClient::global().map_err(server_error)?;
    client
        .daily_availability(token.as_deref(), installation_id, &date)
        .await
        .map_err(server_error)
}

#[server(CreateReservation)]
pub async fn create_reservation(
    token: Option<String>,
    reservation: NewReservation,
) -> Result<Option<ReservationRecord>, ServerFnError> {
    use crate::data::api::ApiClient;

    let client = ApiClient::global().map_err(server_error)?;
    let created = client
        .create_reservation(token.as_deref(), &reservation)
        .await
        .map_err(server_error)?;
    log::info!(
        "reservation created for user {} at installation {} from {}",
        reservation.user_id,
        reservation.installation_id,
        reservation.start
    );
    Ok(created)
}

#[server(GetUserReservations)]
pub async fn get_user_reservations(
    token: Option<String>,
    user_id: i64,
) -> Result<Vec<ReservationRecord>, ServerFnError> {
    use crate::data::api::ApiClient;

    let client = ApiClient::global().map_err(server_error)?;
    client
        .user_reservations(token.as_deref(), user_id)
        .await
        .map_err(server_error)
}

#[server(CancelReservation)]
pub async fn cancel_reservation(
    token: Option<String>,
    reservation_id: i64,
    user_id: i64,
) -> Result<Option<ReservationRecord>, ServerFnError> {
    use crate::data::api::ApiClient;

    let client = ApiClient::global().map_err(server_error)?;
    client
        .cancel_reservation(token.as_deref(), reservation_id, user_id)
        .await
        .map_err(server_error)
}

/// Text to show the user for a failed server call.
pub fn user_message(e: &ServerFnError) -> String {
    match e {
        ServerFnError::ServerError(msg) => msg.clone(),
        other => other.to_string(),
    }
}
