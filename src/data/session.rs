use serde::{Deserialize, Serialize};

use super::shared_booking::LoginResponse;

#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "aytodeporte_session";

/// Who is logged in, as last reported by `POST /users/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
}

impl Session {
    pub fn from_login(response: LoginResponse) -> Self {
        Session {
            token: response.token,
            user_id: response.id.filter(|id| *id > 0),
            email: response.email,
            role: response.rol,
            name: response.nombre.filter(|n| !n.trim().is_empty()),
        }
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| "Invitado".to_string())
    }
}

#[cfg(target_arch = "wasm32")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Reads the stored session. Always `None` outside the browser.
pub fn load() -> Option<Session> {
    #[cfg(target_arch = "wasm32")]
    {
        let raw = storage()?.get_item(STORAGE_KEY).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("ignoring unreadable stored session: {}", e);
                None
            }
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

pub fn save(session: &Session) {
    #[cfg(target_arch = "wasm32")]
    {
        if let (Some(storage), Ok(raw)) = (storage(), serde_json::to_string(session)) {
            let _ = storage.set_item(STORAGE_KEY, &raw);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = session;
}

pub fn clear() {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(storage) = storage() {
            let _ = storage.remove_item(STORAGE_KEY);
        }
    }
}
