//! Logging facade. Grounded on `logging.h`/`logging.c`'s `logger_interface`
//! and `libtl_register_logger`, reworked onto the `log` crate's global
//! facade instead of a hand-rolled function-pointer table: `log::set_logger`
//! already gives the same first-call-wins semantics the original's registry
//! was built to provide.

/// Installs `logger` as the crate's log sink, if none has been installed
/// yet. Returns `false` if a logger was already registered — matching the
/// original's behavior of keeping whichever logger was registered first.
pub fn register_logger(logger: &'static dyn log::Log, level: log::LevelFilter) -> bool {
    match log::set_logger(logger) {
        Ok(()) => {
            log::set_max_level(level);
            true
        }
        Err(_) => false,
    }
}

/// Installs `env_logger` as the default sink, reading its configuration
/// from the `RUST_LOG` environment variable. A no-op if a logger is already
/// registered.
#[cfg(feature = "std")]
pub fn init_default_logger() {
    let _ = env_logger::try_init();
}
