// Macros for optional logging
//
// The core must build without a logger on bare-metal targets, so every log
// call goes through these and disappears when the `log` feature is off.

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! log_error {
    ($($arg:tt)*) => { log::error!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_error {
    ($($arg:tt)*) => {{}};
}
