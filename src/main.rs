#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use aytodeporte_web::app::*;
    use aytodeporte_web::data::api::ApiClient;
    use aytodeporte_web::logger;
    use aytodeporte_web::settings::Settings;
    use axum::Router;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};

    let settings = match Settings::from_yaml("settings.yaml") {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("ERROR: failed to load settings.yaml: {}", e);
            std::process::exit(1);
        }
    };
    logger::init(&settings.log_level);

    match ApiClient::from_settings(&settings) {
        Ok(client) => ApiClient::install(client),
        Err(e) => {
            log::error!("failed to build API client: {}", e);
            std::process::exit(1);
        }
    }
    log::info!("proxying booking API at {}", settings.api_base_url);

    let conf = match get_configuration(None) {
        Ok(conf) => conf,
        Err(e) => {
            log::error!("failed to read leptos configuration: {}", e);
            std::process::exit(1);
        }
    };
    let addr = conf.leptos_options.site_addr;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(App);

    let app = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let leptos_options = leptos_options.clone();
            move || shell(leptos_options.clone())
        })
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptos_options);

    log::info!("listening on http://{}", &addr);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        log::error!("server stopped: {}", e);
    }
}

#[cfg(not(feature = "ssr"))]
pub fn main() {}
