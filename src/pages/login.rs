use std::sync::LazyLock;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use regex::Regex;

use crate::app::use_session;
use crate::data::session::{self, Session};
use crate::pages::server::{login, user_message};

/// Field errors for the login form; `None` means the field is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginErrors {
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl LoginErrors {
    pub fn is_valid(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"));

/// Something `@` something `.` something, no whitespace anywhere.
pub(crate) fn looks_like_email(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value)
}

pub fn validate_login(email: &str, password: &str) -> LoginErrors {
    let email = email.trim();
    let password = password.trim();

    LoginErrors {
        email: if email.is_empty() {
            Some("El correo es obligatorio")
        } else if !looks_like_email(email) {
            Some("Introduce un correo válido")
        } else {
            None
        },
        password: if password.is_empty() {
            Some("La contraseña es obligatoria")
        } else if password.chars().count() < 4 {
            Some("La contraseña debe tener al menos 4 caracteres")
        } else {
            None
        },
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let current = use_session().0;
    let navigate = use_navigate();

    let (email_input, set_email_input) = signal(String::new());
    let (password_input, set_password_input) = signal(String::new());
    let (errors, set_errors) = signal(LoginErrors::default());
    let (login_error, set_login_error) = signal::<Option<String>>(None);
    let (is_submitting, set_is_submitting) = signal(false);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let email = email_input.get_untracked();
        let password = password_input.get_untracked();

        let checked = validate_login(&email, &password);
        let valid = checked.is_valid();
        set_errors.set(checked);
        set_login_error.set(None);
        if !valid {
            return;
        }

        set_is_submitting.set(true);
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match login(email, password).await {
                Ok(response) => {
                    let logged = Session::from_login(response);
                    session::save(&logged);
                    current.set(Some(logged));
                    navigate("/", Default::default());
                }
                Err(err) => {
                    leptos::logging::error!("Error en login: {:?}", err);
                    set_login_error.set(Some(user_message(&err)));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-md mx-auto p-4">
            <h2 class="text-2xl font-bold text-gray-800 mb-4">"Iniciar sesión"</h2>
            <form class="flex flex-col gap-3" on:submit=submit>
                <div class="flex flex-col">
                    <label for="email" class="text-sm font-medium text-gray-700 mb-1">"Correo electrónico"</label>
                    <input
                        id="email"
                        type="email"
                        class="px-3 py-2 border border-gray-300 rounded-md"
                        prop:value=move || email_input.get()
                        on:input=move |ev| set_email_input.set(event_target_value(&ev))
                    />
                    <div class="text-xs text-red-600">{move || errors.get().email.unwrap_or_default()}</div>
                </div>
                <div class="flex flex-col">
                    <label for="password" class="text-sm font-medium text-gray-700 mb-1">"Contraseña"</label>
                    <input
                        id="password"
                        type="password"
                        class="px-3 py-2 border border-gray-300 rounded-md"
                        prop:value=move || password_input.get()
                        on:input=move |ev| set_password_input.set(event_target_value(&ev))
                    />
                    <div class="text-xs text-red-600">{move || errors.get().password.unwrap_or_default()}</div>
                </div>
                <button
                    type="submit"
                    class="px-4 py-2 bg-blue-600 text-white rounded-md hover:bg-blue-700 disabled:opacity-50"
                    disabled=move || is_submitting.get()
                >
                    "Entrar"
                </button>
                <div class="text-sm text-red-600">{move || login_error.get().unwrap_or_default()}</div>
            </form>
            <p class="mt-4 text-sm text-gray-600">
                "¿No tienes cuenta? " <A href="/register">"Regístrate"</A>
            </p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(looks_like_email("ana@example.org"));
        assert!(!looks_like_email("ana@example"));
        assert!(!looks_like_email("@example.org"));
        assert!(!looks_like_email("ana @example.org"));
        assert!(!looks_like_email("ana@.org"));
        assert!(looks_like_email("@a@b.c"));
        assert!(looks_like_email("ana.b@mail.example.org"));
    }

    #[test]
    fn login_validation_messages() {
        let empty = validate_login("", " ");
        assert_eq!(empty.email, Some("El correo es obligatorio"));
        assert_eq!(empty.password, Some("La contraseña es obligatoria"));

        let short = validate_login("ana@example.org", "abc");
        assert_eq!(short.email, None);
        assert_eq!(short.password, Some("La contraseña debe tener al menos 4 caracteres"));

        assert!(validate_login(" ana@example.org ", "abcd").is_valid());
    }
}
