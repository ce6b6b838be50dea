use tracing_subscriber::EnvFilter;

/// Initialize tracing and bridge `log` records (egui, eframe, wgpu) into it.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(enable_debug: bool) {
    let _ = tracing_log::LogTracer::init();

    // Debug flag wins over RUST_LOG; without either only warnings are shown
    let env_filter = if enable_debug {
        EnvFilter::new("histoview=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .ok();
}
