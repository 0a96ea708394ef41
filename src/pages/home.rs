use leptos::prelude::*;
use leptos_router::components::A;

use crate::app::use_session;
use crate::data::pricing::price;
use crate::data::slots::{duration_label, CANDIDATE_DURATIONS};

#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_session();

    view! {
        <div class="max-w-4xl mx-auto p-4">
            <div class="mb-6">
                <h2 class="text-2xl font-bold text-gray-800">"Instalaciones deportivas municipales"</h2>
                <p class="mt-1 text-sm text-gray-600">
                    {move || match session.0.get() {
                        Some(s) => format!("Hola, {}. Reserva tu pista en unos segundos.", s.display_name()),
                        None => "Consulta la disponibilidad y reserva tu pista en unos segundos.".to_string(),
                    }}
                </p>
            </div>

            <div class="flex flex-wrap gap-4 mb-6">
                <A href="/installations">
                    <span class="inline-block px-4 py-2 bg-blue-600 text-white rounded-md hover:bg-blue-700">
                        "Ver instalaciones"
                    </span>
                </A>
                <A href="/reservations">
                    <span class="inline-block px-4 py-2 bg-green-600 text-white rounded-md hover:bg-green-700">
                        "Reservar ahora"
                    </span>
                </A>
            </div>

            <div class="bg-white border border-gray-200 rounded-lg p-4">
                <h3 class="font-semibold text-gray-800 mb-2">"Tarifas"</h3>
                <table class="min-w-full text-sm">
                    <tbody class="divide-y divide-gray-200">
                        {CANDIDATE_DURATIONS
                            .into_iter()
                            .map(|minutes| view! {
                                <tr>
                                    <td class="py-1.5 text-gray-700">{duration_label(minutes)}</td>
                                    <td class="py-1.5 text-right font-medium text-gray-900">{price(minutes).to_string()}</td>
                                </tr>
                            })
                            .collect_view()}
                    </tbody>
                </table>
                <p class="mt-2 text-xs text-gray-500 italic">
                    "Horario de 8:00 a 23:00. Reservas de 1 a 3 horas en tramos de 30 minutos. "
                    "Las cancelaciones se admiten hasta 4 horas antes del inicio."
                </p>
            </div>
        </div>
    }
}
