mod app;
mod config;
mod convert;
mod messages;
mod panels;
mod state;
mod worker;

use std::sync::Arc;

use hdrscope_core::gateway::Gateway;
use hdrscope_core::progress::ProgressHub;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // The engine host injects its bridge here, possibly after the UI is up;
    // until then every engine-bound operation short-circuits with a log line.
    let gateway = Arc::new(Gateway::new());
    let hub = ProgressHub::new();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("hdrscope"),
        ..Default::default()
    };

    eframe::run_native(
        "hdrscope",
        options,
        Box::new(move |cc| Ok(Box::new(app::HdrscopeApp::new(&cc.egui_ctx, gateway, hub)))),
    )
}
