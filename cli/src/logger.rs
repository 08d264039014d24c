use std::io::Write as _;

use colored::Colorize;
use env_logger::Env;
use pagrade_core::sink::ColorTheme;

/// `RUST_LOG` wins over the verbosity flag.
pub fn init(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let level = record.level();
            writeln!(
                buf,
                "{} {:>5} {}",
                chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
                level.to_string().color(level.color()).bold(),
                record.args()
            )
        })
        .init();
}
