use leptos::prelude::*;
use leptos_router::components::A;

use crate::app::use_session;
use crate::data::session::{self, Session};
use crate::data::shared_booking::RegisterRequest;
use crate::pages::login::looks_like_email;
use crate::pages::server::{register, user_message};

pub const MIN_PASSWORD_CHARS: usize = 6;

/// Checks the form the way the backend expects it. Names and email are
/// trimmed; passwords are taken as typed.
pub fn validate_registration(
    nombre: &str,
    apellido: &str,
    email: &str,
    password: &str,
    password_repeat: &str,
) -> Result<RegisterRequest, &'static str> {
    let (nombre, apellido, email) = (nombre.trim(), apellido.trim(), email.trim());

    if [nombre, apellido, email, password, password_repeat]
        .iter()
        .any(|field| field.is_empty())
    {
        return Err("Rellena todos los campos.");
    }
    if !looks_like_email(email) {
        return Err("Introduce un correo válido.");
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err("La contraseña debe tener al menos 6 caracteres.");
    }
    if password != password_repeat {
        return Err("Las contraseñas no coinciden.");
    }

    Ok(RegisterRequest {
        email: email.to_string(),
        password: password.to_string(),
        nombre: nombre.to_string(),
        apellido: apellido.to_string(),
    })
}

#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    kind: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col">
            <label for=id class="text-sm font-medium text-gray-700 mb-1">{label}</label>
            <input
                id=id
                type=kind
                class="px-3 py-2 border border-gray-300 rounded-md"
                prop:value=move || value.get()
                on:input=move |ev| set_value.set(event_target_value(&ev))
            />
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let current = use_session().0;

    let (nombre, set_nombre) = signal(String::new());
    let (apellido, set_apellido) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (password_repeat, set_password_repeat) = signal(String::new());
    let (register_error, set_register_error) = signal::<Option<String>>(None);
    let (is_submitting, set_is_submitting) = signal(false);
    let (welcome, set_welcome) = signal::<Option<String>>(None);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_register_error.set(None);

        let request = match validate_registration(
            &nombre.get_untracked(),
            &apellido.get_untracked(),
            &email.get_untracked(),
            &password.get_untracked(),
            &password_repeat.get_untracked(),
        ) {
            Ok(request) => request,
            Err(msg) => {
                set_register_error.set(Some(msg.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        let fallback_name = request.nombre.clone();
        leptos::task::spawn_local(async move {
            match register(request).await {
                Ok(response) => {
                    let logged = Session::from_login(response);
                    session::save(&logged);
                    let name = logged.name.clone().unwrap_or(fallback_name);
                    current.set(Some(logged));
                    set_welcome.set(Some(name));
                    for clear in [set_nombre, set_apellido, set_email, set_password, set_password_repeat] {
                        clear.set(String::new());
                    }
                }
                Err(err) => {
                    leptos::logging::error!("Error en registro: {:?}", err);
                    set_register_error.set(Some(user_message(&err)));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-md mx-auto p-4">
            <h2 class="text-2xl font-bold text-gray-800 mb-4">"Crear cuenta"</h2>
            {move || match welcome.get() {
                Some(name) => view! {
                    <div class="p-4 rounded-lg bg-green-50 border border-green-200">
                        <h3 class="font-semibold text-green-900">{format!("¡Bienvenido/a {name}!")}</h3>
                        <p class="mt-1 text-sm text-green-800">
                            "Tu cuenta se ha creado correctamente y tu sesión ya está iniciada."
                        </p>
                        <div class="mt-3 flex gap-4 text-sm">
                            <A href="/profile">"Ir a Mi perfil"</A>
                            <A href="/">"Ir al inicio"</A>
                        </div>
                    </div>
                }
                .into_any(),
                None => view! {
                    <form class="flex flex-col gap-3" on:submit=submit>
                        <TextField id="nombre" label="Nombre" kind="text" value=nombre set_value=set_nombre/>
                        <TextField id="apellido" label="Apellidos" kind="text" value=apellido set_value=set_apellido/>
                        <TextField id="email" label="Correo electrónico" kind="email" value=email set_value=set_email/>
                        <TextField id="password" label="Contraseña" kind="password" value=password set_value=set_password/>
                        <TextField
                            id="password2"
                            label="Repite la contraseña"
                            kind="password"
                            value=password_repeat
                            set_value=set_password_repeat
                        />
                        <button
                            type="submit"
                            class="px-4 py-2 bg-blue-600 text-white rounded-md hover:bg-blue-700 disabled:opacity-50"
                            disabled=move || is_submitting.get()
                        >
                            "Registrarme"
                        </button>
                        <div class="text-sm text-red-600">{move || register_error.get().unwrap_or_default()}</div>
                        <p class="text-sm text-gray-600">
                            "¿Ya tienes cuenta? " <A href="/login">"Inicia sesión"</A>
                        </p>
                    </form>
                }
                .into_any(),
            }}
        </div>
    }
}
