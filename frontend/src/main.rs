#[cfg(target_arch = "wasm32")]
fn main() {
    use brochure_frontend::config;
    use log::info;

    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting page scripts");
    brochure_frontend::web::start(config::Settings::default());
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("brochure-frontend runs in the browser; build it for wasm32-unknown-unknown");
}
