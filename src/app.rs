use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{
    components::{FlatRoutes, Route, Router, A},
    StaticSegment,
};

use crate::data::session::{self, Session};
use crate::pages::home::HomePage;
use crate::pages::installations::InstallationsPage;
use crate::pages::login::LoginPage;
use crate::pages::profile::ProfilePage;
use crate::pages::register::RegisterPage;
use crate::pages::reservations::ReservationsPage;

/// Logged-in user, shared by every page. Filled from storage once the app
/// is running in the browser.
#[derive(Clone, Copy)]
pub struct SessionContext(pub RwSignal<Option<Session>>);

impl SessionContext {
    pub fn token(&self) -> Option<String> {
        self.0.with_untracked(|s| s.as_ref().map(|s| s.token.clone()))
    }
}

pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="es">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <Stylesheet id="leptos" href="/pkg/aytodeporte-web.css"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <Link rel="preconnect" href="https://fonts.googleapis.com"/>
                <Link rel="preconnect" href="https://fonts.gstatic.com" crossorigin="anonymous"/>
                <Link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap" rel="stylesheet"/>
                <MetaTags/>
            </head>
            <body class="bg-gray-50">
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let current = RwSignal::new(None::<Session>);
    provide_context(SessionContext(current));

    Effect::new(move |_| {
        current.set(session::load());
    });

    view! {
        <Title text="Reservas deportivas municipales"/>
        <Router>
            <NavBar/>
            <main>
                <FlatRoutes fallback=|| "Página no encontrada.">
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("installations") view=InstallationsPage/>
                    <Route path=StaticSegment("reservations") view=ReservationsPage/>
                    <Route path=StaticSegment("profile") view=ProfilePage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                </FlatRoutes>
            </main>
        </Router>
    }
}

#[component]
fn NavBar() -> impl IntoView {
    let current = use_session().0;

    let logout = move |_| {
        session::clear();
        current.set(None);
    };

    view! {
        <nav class="bg-white border-b border-gray-200">
            <div class="max-w-4xl mx-auto px-4 py-3 flex items-center gap-4 text-sm">
                <A href="/">
                    <span class="font-bold text-gray-800">"Deportes"</span>
                </A>
                <A href="/installations">"Instalaciones"</A>
                <A href="/reservations">"Reservar"</A>
                <div class="ml-auto flex items-center gap-3">
                    {move || match current.get() {
                        Some(session) => view! {
                            <A href="/profile">{session.display_name()}</A>
                            <button class="text-gray-500 hover:text-gray-800" on:click=logout>
                                "Cerrar sesión"
                            </button>
                        }.into_any(),
                        None => view! {
                            <A href="/login">"Iniciar sesión"</A>
                            <A href="/register">"Registrarse"</A>
                        }.into_any(),
                    }}
                </div>
            </div>
        </nav>
    }
}
