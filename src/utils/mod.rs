pub mod command;
pub mod permissions;

// Макрос условного логирования для горячих путей (отпечатки каждой страницы, опрос фокуса)
#[macro_export]
macro_rules! debug_if_enabled {
    ($($arg:tt)*) => {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}
