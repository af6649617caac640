pub mod cmd;
pub mod config;
pub mod error;
pub mod record;

pub fn log_error<T>(x: Result<T, anyhow::Error>) -> Option<T> {
    x.map_err(|e| {
        log::error!("{e}");
    })
    .ok()
}
