use chrono::{Local, NaiveDateTime};
use leptos::prelude::*;

use crate::app::use_session;
use crate::data::reservation::{
    can_cancel, count_label, filter_reservations, normalize, Reservation, ReservationFilter,
    ReservationPhase, ReservationStatus,
};
use crate::data::slots::duration_label;
use crate::pages::server::{cancel_reservation, get_user_reservations, user_message};
use crate::utils::date::{format_date_human, format_hhmm};

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session = use_session();

    let (reservations, set_reservations) = signal(Vec::<Reservation>::new());
    let (filter, set_filter) = signal(ReservationFilter::default());
    let (is_loading, set_is_loading) = signal(false);
    let (load_error, set_load_error) = signal::<Option<String>>(None);
    let (cancel_error, set_cancel_error) = signal::<Option<String>>(None);
    let (cancelling, set_cancelling) = signal::<Option<i64>>(None);

    let load = move || {
        let Some((token, Some(user_id))) = session
            .0
            .with_untracked(|s| s.as_ref().map(|s| (s.token.clone(), s.user_id)))
        else {
            set_reservations.set(Vec::new());
            return;
        };

        set_is_loading.set(true);
        set_load_error.set(None);
        leptos::task::spawn_local(async move {
            match get_user_reservations(Some(token), user_id).await {
                Ok(records) => set_reservations.set(normalize(&records)),
                Err(err) => {
                    leptos::logging::error!("Error fetching reservations: {:?}", err);
                    set_reservations.set(Vec::new());
                    set_load_error.set(Some(user_message(&err)));
                }
            }
            set_is_loading.set(false);
        });
    };

    Effect::new(move |_| {
        session.0.track();
        load();
    });

    let cancel = move |reservation_id: i64| {
        let Some((token, Some(user_id))) = session
            .0
            .with_untracked(|s| s.as_ref().map(|s| (s.token.clone(), s.user_id)))
        else {
            set_cancel_error.set(Some("Debes iniciar sesión para cancelar una reserva.".to_string()));
            return;
        };

        set_cancelling.set(Some(reservation_id));
        set_cancel_error.set(None);
        leptos::task::spawn_local(async move {
            match cancel_reservation(Some(token), reservation_id, user_id).await {
                Ok(_) => {
                    set_reservations.update(|list| {
                        if let Some(r) = list.iter_mut().find(|r| r.id == reservation_id) {
                            r.status = ReservationStatus::Cancelled;
                        }
                    });
                }
                Err(err) => {
                    // The backend owns the 4h rule; its refusal stands even if
                    // the local clock allowed the attempt.
                    leptos::logging::error!("Error cancelling reservation: {:?}", err);
                    set_cancel_error.set(Some(user_message(&err)));
                }
            }
            set_cancelling.set(None);
        });
    };

    let visible = Memo::new(move |_| filter_reservations(&reservations.get(), filter.get(), now()));

    view! {
        <div class="max-w-4xl mx-auto p-4">
            <h2 class="text-2xl font-bold text-gray-800 mb-1">"Mi perfil"</h2>
            <div class="text-sm text-gray-600 mb-4">
                {move || match session.0.get() {
                    Some(s) => format!(
                        "{} · {}",
                        s.display_name(),
                        s.email.unwrap_or_else(|| "sin correo".to_string())
                    ),
                    None => "Usuario sin sesión iniciada".to_string(),
                }}
            </div>

            <div class="flex items-center gap-4 mb-4">
                <select
                    id="reservationsFilter"
                    class="px-3 py-2 border border-gray-300 rounded-md"
                    prop:value=move || filter.get().as_value()
                    on:change=move |ev| set_filter.set(ReservationFilter::from_value(&event_target_value(&ev)))
                >
                    {ReservationFilter::ALL
                        .into_iter()
                        .map(|f| view! { <option value=f.as_value()>{f.label()}</option> })
                        .collect_view()}
                </select>
                <span class="text-sm text-gray-500">{move || count_label(visible.with(Vec::len))}</span>
            </div>

            {move || load_error.get().map(|msg| view! {
                <div class="p-3 mb-3 rounded-md bg-red-50 border border-red-200 text-sm text-red-700">{msg}</div>
            })}
            {move || cancel_error.get().map(|msg| view! {
                <div class="p-3 mb-3 rounded-md bg-red-50 border border-red-200 text-sm text-red-700">
                    "No se ha podido cancelar la reserva: " {msg}
                </div>
            })}

            <div class="flex flex-col gap-3" aria-busy=move || is_loading.get().to_string()>
                {move || {
                    if session.0.with(|s| s.as_ref().and_then(|s| s.user_id).is_none()) {
                        return view! {
                            <p class="text-sm text-gray-500">"Debes iniciar sesión para consultar tus reservas."</p>
                        }.into_any();
                    }
                    let list = visible.get();
                    if list.is_empty() {
                        let text = if reservations.with(Vec::is_empty) {
                            "No tienes reservas registradas todavía."
                        } else {
                            "No hay reservas que cumplan el filtro."
                        };
                        return view! { <p class="text-sm text-gray-500">{text}</p> }.into_any();
                    }
                    let at = now();
                    list.into_iter()
                        .map(|r| view! { <ReservationCard reservation=r now=at cancelling=cancelling on_cancel=cancel/> })
                        .collect_view()
                        .into_any()
                }}
            </div>
        </div>
    }
}

#[component]
fn ReservationCard<F>(
    reservation: Reservation,
    now: NaiveDateTime,
    cancelling: ReadSignal<Option<i64>>,
    on_cancel: F,
) -> impl IntoView
where
    F: Fn(i64) + Copy + Send + Sync + 'static,
{
    let phase = reservation.phase(now);
    let chip_class = match phase {
        ReservationPhase::Upcoming => "bg-green-100 text-green-800",
        ReservationPhase::Finished => "bg-gray-100 text-gray-700",
        ReservationPhase::Cancelled => "bg-red-100 text-red-700",
    };
    let id = reservation.id;
    let cancellable = can_cancel(&reservation, now);
    let name = reservation
        .installation_name
        .clone()
        .unwrap_or_else(|| "Instalación".to_string());
    let when = format!(
        "{} · {} - {}",
        format_date_human(reservation.start.date()),
        format_hhmm(reservation.start.time()),
        format_hhmm(reservation.end_or_projected().time())
    );

    view! {
        <article class="bg-white border border-gray-200 rounded-lg p-4">
            <div class="flex justify-between items-start">
                <div>
                    <h3 class="font-semibold text-gray-900">{name}</h3>
                    <div class="text-sm text-gray-500">{when}</div>
                </div>
                <span class=format!("px-2 py-1 rounded-md text-xs {chip_class}")>{phase.label()}</span>
            </div>
            <div class="mt-2 text-sm text-gray-700">
                "Código de reserva: " <strong>{reservation.code.clone().unwrap_or_else(|| "-".to_string())}</strong>
            </div>
            <div class="mt-2 flex gap-2 text-xs">
                <span class="px-2 py-1 rounded-full bg-gray-100">
                    {format!("Duración: {}", duration_label(reservation.duration_minutes()))}
                </span>
                <span class="px-2 py-1 rounded-full bg-gray-100">
                    {format!("Importe: {}", reservation.display_amount())}
                </span>
            </div>
            <div class="mt-3">
                {if cancellable {
                    view! {
                        <button
                            class="px-3 py-1.5 text-sm border border-gray-300 rounded-md hover:bg-gray-50 disabled:opacity-50"
                            disabled=move || cancelling.get().is_some()
                            on:click=move |_| on_cancel(id)
                        >
                            {move || if cancelling.get() == Some(id) { "Cancelando..." } else { "Cancelar reserva" }}
                        </button>
                    }.into_any()
                } else {
                    view! {
                        <button class="px-3 py-1.5 text-sm border border-gray-200 rounded-md text-gray-400" disabled=true>
                            "No se puede cancelar"
                        </button>
                    }.into_any()
                }}
            </div>
        </article>
    }
}
