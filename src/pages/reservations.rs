use chrono::Local;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_query_map;

use crate::app::use_session;
use crate::data::booking::{AvailabilityKey, BookingState, SelectionError};
use crate::data::slots::{duration_label, SlotIndex, CANDIDATE_DURATIONS};
use crate::pages::server::{create_reservation, get_daily_availability, get_installations, user_message};
use crate::utils::date::{format_date_human, format_hhmm, parse_date};

#[component]
pub fn ReservationsPage() -> impl IntoView {
    let session = use_session();
    let query = use_query_map();

    let state = RwSignal::new(BookingState::new());

    let (installation_input, set_installation_input) = signal(String::new());
    let (date_input, set_date_input) = signal(Local::now().date_naive().format("%Y-%m-%d").to_string());

    let (installations_error, set_installations_error) = signal::<Option<String>>(None);
    let (availability_error, set_availability_error) = signal::<Option<String>>(None);
    let (is_loading, set_is_loading) = signal(false);
    let (feedback, set_feedback) = signal::<Option<String>>(None);
    let (is_submitting, set_is_submitting) = signal(false);
    let (confirmation, set_confirmation) = signal::<Option<String>>(None);

    let logged_in = move || session.0.with(|s| s.is_some());

    let fetch_availability = move || {
        let installation_id = installation_input.get_untracked().parse::<i64>().ok();
        let date = parse_date(&date_input.get_untracked());
        let (Some(installation_id), Some(date)) = (installation_id, date) else {
            state.update(BookingState::reset);
            set_is_loading.set(false);
            set_availability_error.set(None);
            return;
        };

        let Some(request) =
            state.try_update(|s| s.begin_request(AvailabilityKey { installation_id, date }))
        else {
            return;
        };
        set_is_loading.set(true);
        set_availability_error.set(None);
        let token = session.token();

        leptos::task::spawn_local(async move {
            let result = get_daily_availability(token, installation_id, date.format("%Y-%m-%d").to_string()).await;
            match result {
                Ok(response) => {
                    let index = SlotIndex::from_response(&response);
                    state.update(|s| {
                        s.apply_availability(request, index);
                    });
                }
                Err(err) => {
                    leptos::logging::error!("Error fetching availability: {:?}", err);
                    if state.try_update(|s| s.fail_request(request)).unwrap_or(false) {
                        set_availability_error.set(Some(user_message(&err)));
                    }
                }
            }
            if state.with_untracked(|s| s.is_current(request)) {
                set_is_loading.set(false);
            }
        });
    };

    // Reloads once the stored session is known, so guests and users both
    // get the installation list the backend allows them to see.
    Effect::new(move |_| {
        let token = session.0.with(|s| s.as_ref().map(|s| s.token.clone()));
        leptos::task::spawn_local(async move {
            match get_installations(token).await {
                Ok(list) => {
                    set_installations_error.set(None);
                    state.update(|s| s.installations = list);
                    if installation_input.get_untracked().is_empty() {
                        if let Some(id) = query.get_untracked().get("installationId") {
                            set_installation_input.set(id);
                        }
                    }
                    fetch_availability();
                }
                Err(err) => {
                    leptos::logging::error!("Error fetching installations: {:?}", err);
                    let msg = if session.0.with_untracked(|s| s.is_some()) {
                        "Error al cargar las instalaciones".to_string()
                    } else {
                        "Inicia sesión para ver las instalaciones".to_string()
                    };
                    set_installations_error.set(Some(msg));
                }
            }
        });
    });

    let select_start = move |index: usize| {
        set_feedback.set(None);
        set_confirmation.set(None);
        if let Some(Err(err)) = state.try_update(|s| s.select_start(index)) {
            leptos::logging::log!("start rejected: {}", err);
            set_feedback.set(Some(selection_message(&err).to_string()));
        }
    };

    let confirm = move |_| {
        let Some(current) = session.0.get_untracked() else {
            return;
        };
        let Some(user_id) = current.user_id else {
            set_feedback.set(Some("Debes iniciar sesión para poder reservar.".to_string()));
            return;
        };
        let selection = match state.with_untracked(|s| s.try_selection()) {
            Ok(selection) => selection,
            Err(err) => {
                set_feedback.set(Some(selection_message(&err).to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        set_feedback.set(None);
        let request = selection.to_request(user_id);

        leptos::task::spawn_local(async move {
            match create_reservation(Some(current.token), request).await {
                Ok(created) => {
                    let code = created.and_then(|r| r.code);
                    set_confirmation.set(Some(match code {
                        Some(code) => format!("Reserva confirmada. Código de reserva: {code}"),
                        None => "Reserva confirmada.".to_string(),
                    }));
                    fetch_availability();
                }
                Err(err) => {
                    leptos::logging::error!("Error creating reservation: {:?}", err);
                    set_feedback.set(Some(user_message(&err)));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-4xl mx-auto p-4">
            <h2 class="text-2xl font-bold text-gray-800 mb-4">"Reservar instalación"</h2>

            <div class="flex flex-wrap gap-4 items-end mb-4">
                <div class="flex flex-col flex-grow">
                    <label for="reservationInstallation" class="text-sm font-medium text-gray-700 mb-1">"Instalación"</label>
                    <select
                        id="reservationInstallation"
                        class="px-3 py-2 border border-gray-300 rounded-md"
                        prop:value=move || installation_input.get()
                        on:change=move |ev| {
                            set_installation_input.set(event_target_value(&ev));
                            set_confirmation.set(None);
                            fetch_availability();
                        }
                    >
                        <option value="">"Seleccionar instalación"</option>
                        {move || {
                            state
                                .with(|s| {
                                    s.installations
                                        .iter()
                                        .filter(|inst| inst.is_active())
                                        .map(|inst| (inst.id, inst.display_name()))
                                        .collect::<Vec<_>>()
                                })
                                .into_iter()
                                .map(|(id, name)| view! { <option value=id.to_string()>{name}</option> })
                                .collect_view()
                        }}
                    </select>
                </div>
                <div class="flex flex-col">
                    <label for="reservationDate" class="text-sm font-medium text-gray-700 mb-1">"Fecha"</label>
                    <input
                        id="reservationDate"
                        type="date"
                        class="px-3 py-2 border border-gray-300 rounded-md"
                        prop:value=move || date_input.get()
                        on:change=move |ev| {
                            set_date_input.set(event_target_value(&ev));
                            set_confirmation.set(None);
                            fetch_availability();
                        }
                    />
                </div>
            </div>

            {move || installations_error.get().map(|msg| view! {
                <div class="text-sm text-amber-600 mb-2">{msg}</div>
            })}

            <div class="grid md:grid-cols-3 gap-4">
                <div class="md:col-span-2" aria-busy=move || is_loading.get().to_string()>
                    <AvailabilityCard
                        state=state
                        is_loading=is_loading
                        error=availability_error
                        on_select=select_start
                    />
                </div>

                <div class="bg-white border border-gray-200 rounded-lg p-4 flex flex-col gap-3">
                    <h3 class="font-semibold text-gray-800">"Resumen"</h3>

                    <label for="durationSelect" class="text-sm font-medium text-gray-700">"Duración"</label>
                    <select
                        id="durationSelect"
                        class="px-3 py-2 border border-gray-300 rounded-md"
                        disabled=move || !logged_in() || state.with(|s| s.base_index().is_none())
                        prop:value=move || state.with(|s| s.duration().unwrap_or(60).to_string())
                        on:change=move |ev| {
                            if let Ok(minutes) = event_target_value(&ev).parse::<u32>() {
                                if let Some(Err(err)) = state.try_update(|s| s.set_duration(minutes)) {
                                    leptos::logging::log!("duration rejected: {}", err);
                                    set_feedback.set(Some(selection_message(&err).to_string()));
                                }
                            }
                        }
                    >
                        {move || {
                            state
                                .with(|s| s.duration_choice().map(|c| c.allowed))
                                .unwrap_or_else(|| CANDIDATE_DURATIONS.to_vec())
                                .into_iter()
                                .map(|d| view! { <option value=d.to_string()>{duration_label(d)}</option> })
                                .collect_view()
                        }}
                    </select>

                    <Summary state=state logged_in=Signal::derive(logged_in)/>

                    {move || if logged_in() {
                        view! {
                            <button
                                id="btnConfirmReservation"
                                class="px-4 py-2 bg-green-600 text-white rounded-md hover:bg-green-700 disabled:opacity-50"
                                disabled=move || is_submitting.get() || state.with(|s| s.selection().is_none())
                                on:click=confirm
                            >
                                "Confirmar reserva"
                            </button>
                        }.into_any()
                    } else {
                        view! {
                            <A href="/login">
                                <span class="block text-center px-4 py-2 bg-blue-600 text-white rounded-md">
                                    "Inicia sesión para reservar"
                                </span>
                            </A>
                        }.into_any()
                    }}

                    <div class="text-sm text-red-600">{move || feedback.get().unwrap_or_default()}</div>

                    {move || confirmation.get().map(|msg| view! {
                        <div class="p-3 rounded-md bg-green-50 border border-green-200 text-sm text-green-800">
                            <p>{msg}</p>
                            <A href="/profile">"Ir a Mi perfil"</A>
                        </div>
                    })}
                </div>
            </div>
        </div>
    }
}

fn selection_message(err: &SelectionError) -> &'static str {
    match err {
        SelectionError::NoAvailability => "Elige una instalación y una fecha antes de seleccionar la hora.",
        SelectionError::NotSelectable(_) => {
            "Esta hora de inicio no permite reservar al menos 1 hora completa."
        }
        SelectionError::NoBaseSlot => "Selecciona una hora de inicio.",
        SelectionError::DurationNotAllowed(_) => "La duración elegida no cabe en la franja disponible.",
        SelectionError::CrossesMidnight => "La reserva no puede terminar después de medianoche.",
    }
}

#[component]
fn AvailabilityCard<F>(
    state: RwSignal<BookingState>,
    is_loading: ReadSignal<bool>,
    error: ReadSignal<Option<String>>,
    on_select: F,
) -> impl IntoView
where
    F: Fn(usize) + Copy + Send + Sync + 'static,
{
    move || {
        if let Some(msg) = error.get() {
            return view! {
                <div class="p-3 rounded-md bg-red-50 border border-red-200 text-sm text-red-700">
                    "No se ha podido cargar la disponibilidad: " {msg}
                </div>
            }
            .into_any();
        }

        let grid = state.with(|s| {
            s.availability().map(|index| {
                let starts: Vec<(usize, String)> = index
                    .selectable_starts()
                    .into_iter()
                    .map(|i| (i, format_hhmm(index.slots[i].start)))
                    .collect();
                (
                    index.installation_name.clone().unwrap_or_else(|| "Instalación".to_string()),
                    index.date.map(format_date_human).unwrap_or_default(),
                    index.is_empty(),
                    starts,
                )
            })
        });

        let Some((name, date, is_empty, starts)) = grid else {
            let text = if is_loading.get() {
                "Cargando disponibilidad..."
            } else {
                "Elige una instalación y una fecha para ver la disponibilidad."
            };
            return view! { <p class="text-sm text-gray-500">{text}</p> }.into_any();
        };

        if is_empty {
            return view! {
                <p class="text-sm text-gray-500">"No hay disponibilidad para esta fecha."</p>
            }
            .into_any();
        }

        let count = starts.len();
        view! {
            <article class="bg-white border border-gray-200 rounded-lg p-4">
                <div class="flex justify-between items-start mb-3">
                    <div>
                        <div class="font-semibold text-gray-900">{name}</div>
                        <div class="text-sm text-gray-500">{date}</div>
                    </div>
                    <span class="px-2 py-1 rounded-md bg-blue-50 text-blue-800 text-xs">
                        {format!("{count} horas de inicio disponibles")}
                    </span>
                </div>
                <p class="text-sm text-gray-600 mb-3">
                    "Selecciona una hora de inicio. La duración mínima es de 1 hora y la máxima de 3 horas."
                </p>
                <div class="flex flex-wrap gap-2">
                    {if starts.is_empty() {
                        view! { <span class="text-sm text-gray-400">"No hay franjas disponibles."</span> }.into_any()
                    } else {
                        starts
                            .into_iter()
                            .map(|(i, label)| {
                                let selected = move || state.with(|s| s.base_index() == Some(i));
                                view! {
                                    <button
                                        class=move || if selected() {
                                            "px-3 py-1.5 rounded-md text-sm bg-blue-600 text-white"
                                        } else {
                                            "px-3 py-1.5 rounded-md text-sm bg-gray-100 text-gray-800 hover:bg-gray-200"
                                        }
                                        on:click=move |_| on_select(i)
                                    >
                                        {label}
                                    </button>
                                }
                            })
                            .collect_view()
                            .into_any()
                    }}
                </div>
            </article>
        }
        .into_any()
    }
}

#[component]
fn Summary(state: RwSignal<BookingState>, logged_in: Signal<bool>) -> impl IntoView {
    move || {
        if !logged_in.get() {
            return view! {
                <p class="text-sm text-gray-600">
                    "Puedes consultar la disponibilidad, pero necesitas iniciar sesión para confirmar la reserva."
                </p>
            }
            .into_any();
        }

        let summary = state.with(|s| {
            s.selection().map(|selection| {
                let name = s
                    .installation(selection.installation_id)
                    .map(|inst| inst.display_name())
                    .unwrap_or_else(|| "Instalación seleccionada".to_string());
                (name, selection, s.quote())
            })
        });

        match summary {
            Some((name, selection, quote)) => view! {
                <div class="text-sm">
                    <div class="font-medium text-gray-900">{name}</div>
                    <div class="text-gray-600">
                        {format!(
                            "{} · {} - {}",
                            format_date_human(selection.date),
                            format_hhmm(selection.start),
                            format_hhmm(selection.end)
                        )}
                    </div>
                    <div class="mt-2 font-medium text-gray-900">
                        "Precio: " {quote.map(|p| p.to_string()).unwrap_or_default()}
                    </div>
                </div>
            }
            .into_any(),
            None => view! {
                <p class="text-sm text-gray-600">
                    "Sin selección todavía. Elige una instalación, fecha y hora de inicio."
                </p>
            }
            .into_any(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_short_runs_mention_the_one_hour_minimum() {
        assert!(selection_message(&SelectionError::NotSelectable(3)).contains("1 hora"));
        for err in [
            SelectionError::NoAvailability,
            SelectionError::NoBaseSlot,
            SelectionError::DurationNotAllowed(150),
            SelectionError::CrossesMidnight,
        ] {
            assert!(!selection_message(&err).contains("1 hora"), "{err}");
        }
    }
}
