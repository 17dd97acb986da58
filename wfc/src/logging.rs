use log::LevelFilter;

/// Timed, colored logs on stderr. `RUST_LOG` overrides the defaults.
pub fn init() {
    let mut builder = pretty_env_logger::formatted_timed_builder();
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module("wfc", LevelFilter::Info)
        .filter_module("libwfc", LevelFilter::Info)
        .parse_default_env();
    builder.init();
}
