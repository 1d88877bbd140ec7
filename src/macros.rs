/// Engine tracing; expands to nothing unless the `trace` feature is enabled.
#[cfg(not(feature = "trace"))]
macro_rules! peg_trace {
    ($($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}

#[cfg(feature = "trace")]
macro_rules! peg_trace {
    ($($arg:tt)*) => { log::trace!(target: "peg_engine", $($arg)*) };
}
