mod components;
mod config;
mod error;
mod media;
mod model;
mod state;
mod util;

use components::app::App;
use config::Settings;

fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
    util::init_logging(Settings::load().log_level.into());
    log::info!("trace-overlay {}", env!("CARGO_PKG_VERSION"));
    yew::Renderer::<App>::new().render();
}
