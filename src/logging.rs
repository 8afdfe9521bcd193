use env_logger::Env;
use log::debug;

pub fn setup_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();
    debug!("Logging initialized.");
}
