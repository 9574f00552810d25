use chrono::{DateTime, Local};

/// Prints a timestamped `INFO` progress line.
/// Pass a starting time first to also print how long it took from then until now.
/// ```
/// # use chrono::Local;
/// # use sso_scrape::info_time;
/// info_time!("fetched page {}/{}", 2, 3);
/// let time = Local::now();
/// info_time!(time, "done after {} pages", 3);
/// ```
#[macro_export]
macro_rules! info_time {
    ($strfm:literal $(,)? $($arg:expr),*) => {
        $crate::macros::log_line("INFO", None, format!($strfm, $($arg),*))
    };
    ($time:expr, $strfm:literal $(,)? $($arg:expr),*) => {
        $crate::macros::log_line("INFO", Some($time), format!($strfm, $($arg),*))
    };
}

/// Same as [`info_time!`] but tagged `WARN`, for pages the crawl had to skip or guess about.
#[macro_export]
macro_rules! warn_time {
    ($strfm:literal $(,)? $($arg:expr),*) => {
        $crate::macros::log_line("WARN", None, format!($strfm, $($arg),*))
    };
}

#[doc(hidden)]
pub fn log_line(level: &str, since: Option<DateTime<Local>>, msg: String) {
    println!("{}", format_line(level, Local::now(), since, &msg));
}

fn format_line(
    level: &str,
    now: DateTime<Local>,
    since: Option<DateTime<Local>>,
    msg: &str,
) -> String {
    let line = format!("{:<30} {:<5}: {}", now, level, msg);
    match since {
        Some(start) => {
            let run_time = (now - start)
                .num_microseconds()
                .map(|n| n as f64 / 1_000_000.0)
                .unwrap_or(0.0);
            format!("{line}\nRUNTIME: {run_time} sec")
        }
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn line_carries_level_and_message() {
        let now = Local::now();
        let line = format_line("WARN", now, None, "page 2 skipped");
        assert!(line.starts_with(&now.to_string()));
        assert!(line.ends_with("WARN : page 2 skipped"));
        assert!(!line.contains("RUNTIME"));
    }

    #[test]
    fn elapsed_form_appends_runtime() {
        let now = Local::now();
        let start = now - Duration::milliseconds(1500);
        let line = format_line("INFO", now, Some(start), "done");
        assert!(line.ends_with("done\nRUNTIME: 1.5 sec"));
    }
}
