use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` wins over `verbose`; `json`
/// switches from compact lines to one JSON object per event.
pub fn init_logger(verbose: bool, json: bool) {
    let default_directives = if verbose {
        "sheet_catalog=debug,info"
    } else {
        "sheet_catalog=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let compact = (!json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
    });
    let structured = json.then(|| fmt::layer().with_target(false).json());

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(structured)
        .init();
}
