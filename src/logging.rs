use std::io::Write;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use env_logger::Env;
use log::LevelFilter;

/// Install the process logger: `[<unix-ms>ms][<thread>] LEVEL message`.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug over info.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default))
        .format(|buf, record| {
            let ts = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0);
            let current = thread::current();
            let thread_name = current.name().unwrap_or("unnamed");
            writeln!(buf, "[{ts}ms][{thread_name}] {} {}", record.level(), record.args())
        })
        .try_init();
}

/// Silence everything; used for machine-readable output.
pub fn init_quiet() {
    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Off)
        .try_init();
}
