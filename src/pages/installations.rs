use leptos::prelude::*;
use leptos_router::components::A;

use crate::app::use_session;
use crate::data::installation::{count_label, filter_installations, Installation, KindFilter};
use crate::pages::server::get_installations;

#[component]
pub fn InstallationsPage() -> impl IntoView {
    let session = use_session();

    let (installations, set_installations) = signal(Vec::<Installation>::new());
    let (search_input, set_search_input) = signal(String::new());
    let (kind_input, set_kind_input) = signal(String::new());
    let (is_loading, set_is_loading) = signal(false);
    let (load_error, set_load_error) = signal::<Option<String>>(None);

    Effect::new(move |_| {
        let token = session.0.with(|s| s.as_ref().map(|s| s.token.clone()));
        let logged_in = token.is_some();
        set_is_loading.set(true);
        set_load_error.set(None);

        leptos::task::spawn_local(async move {
            match get_installations(token).await {
                Ok(list) => set_installations.set(list),
                Err(err) => {
                    leptos::logging::error!("Error fetching installations: {:?}", err);
                    set_installations.set(Vec::new());
                    set_load_error.set(Some(if logged_in {
                        "Ha ocurrido un error al cargar las instalaciones.".to_string()
                    } else {
                        "Inicia sesión para ver las instalaciones.".to_string()
                    }));
                }
            }
            set_is_loading.set(false);
        });
    });

    let filtered = Memo::new(move |_| {
        filter_installations(
            &installations.get(),
            &search_input.get(),
            KindFilter::from_value(&kind_input.get()),
        )
    });

    view! {
        <div class="max-w-4xl mx-auto p-4">
            <h2 class="text-2xl font-bold text-gray-800 mb-4">"Instalaciones"</h2>

            <div class="flex flex-wrap gap-4 items-end mb-4">
                <input
                    id="searchInstallations"
                    type="text"
                    class="flex-grow px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500"
                    placeholder="Buscar por nombre o tipo"
                    prop:value=move || search_input.get()
                    on:input=move |ev| set_search_input.set(event_target_value(&ev))
                />
                <select
                    id="typeFilter"
                    class="px-3 py-2 border border-gray-300 rounded-md"
                    prop:value=move || kind_input.get()
                    on:change=move |ev| set_kind_input.set(event_target_value(&ev))
                >
                    <option value="">"Todos los tipos"</option>
                    {KindFilter::ALL
                        .into_iter()
                        .map(|k| view! { <option value=k.as_value()>{k.label()}</option> })
                        .collect_view()}
                </select>
                <span class="text-sm text-gray-500">{move || count_label(filtered.with(Vec::len))}</span>
            </div>

            {move || load_error.get().map(|msg| view! {
                <div class="p-3 mb-3 rounded-md bg-amber-50 border border-amber-200 text-sm text-amber-700">{msg}</div>
            })}

            <div class="grid md:grid-cols-2 gap-3" aria-busy=move || is_loading.get().to_string()>
                {move || {
                    let list = filtered.get();
                    if list.is_empty() && !is_loading.get() {
                        return view! {
                            <p class="text-sm text-gray-500">"No hay instalaciones que coincidan con la búsqueda."</p>
                        }.into_any();
                    }
                    list.into_iter()
                        .map(|inst| view! { <InstallationCard installation=inst/> })
                        .collect_view()
                        .into_any()
                }}
            </div>
        </div>
    }
}

#[component]
fn InstallationCard(installation: Installation) -> impl IntoView {
    let href = format!("/reservations?installationId={}", installation.id);
    let number = installation
        .number
        .map(|n| format!("Nº {n}"))
        .unwrap_or_default();

    view! {
        <article class="bg-white border border-gray-200 rounded-lg p-4 flex flex-col gap-2">
            <h3 class="font-semibold text-gray-900">{installation.display_name()}</h3>
            <div class="flex gap-2 text-xs">
                <span class="px-2 py-1 rounded-full bg-blue-50 text-blue-800">{installation.kind().label()}</span>
                <span class="px-2 py-1 rounded-full bg-gray-100 text-gray-700">{number}</span>
            </div>
            <A href=href>
                <span class="inline-block mt-1 px-3 py-1.5 bg-blue-600 text-white text-sm rounded-md hover:bg-blue-700">
                    "Reservar"
                </span>
            </A>
        </article>
    }
}
