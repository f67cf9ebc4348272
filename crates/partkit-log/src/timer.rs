use chrono::Local;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// 本地时区, 精确到微秒: `2024-03-01 08:15:30.123456`
pub struct LocalTimer;

impl LocalTimer {
    fn render(now: chrono::DateTime<Local>) -> String {
        format!("{}.{:06}", now.format("%Y-%m-%d %H:%M:%S"), now.timestamp_subsec_micros())
    }
}

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Self::render(Local::now()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn renders_micro_seconds() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 8, 15, 30).unwrap() + chrono::Duration::microseconds(42);
        assert_eq!(LocalTimer::render(at), "2024-03-01 08:15:30.000042");
    }
}
