//! Logging macros over an explicit `LoggingService`
//!
//! Every macro takes the service as its first argument. Context values may be
//! any `Display` type and are attached as `key => value` pairs.

/// Log an error with a code
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut event = $crate::logging::LogEvent::error($code, $message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )*
        $logger.log_event(event)
    }};
}

/// Log a success event with a code
#[macro_export]
macro_rules! log_success {
    ($logger:expr, $code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut event = $crate::logging::LogEvent::success($code, $message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )*
        $logger.log_event(event)
    }};
}

/// Log an informational message
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut event = $crate::logging::LogEvent::info($message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )*
        $logger.log_event(event)
    }};
}

/// Log a warning, optionally with a specific code
#[macro_export]
macro_rules! log_warning {
    ($logger:expr, code = $code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut event = $crate::logging::LogEvent::warning_with_code($code, $message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )*
        $logger.log_event(event)
    }};

    ($logger:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut event = $crate::logging::LogEvent::warning($message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )*
        $logger.log_event(event)
    }};
}

/// Log a debug message, optionally with a specific code
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, code = $code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut event = $crate::logging::LogEvent::debug_with_code($code, $message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )*
        $logger.log_event(event)
    }};

    ($logger:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut event = $crate::logging::LogEvent::debug($message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )*
        $logger.log_event(event)
    }};
}
