use std::sync::OnceLock;

use chrono::{DateTime, Local, TimeZone};
use tally_common::observability::{LogConfig, LogFormat, init_logging};
use tally_youtube::ResultRecord;

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "tubetally-tests",
            log_dir: Some(std::env::temp_dir().join("tubetally-tests")),
            format: if std::env::var("TALLY_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
            ..LogConfig::default()
        };

        init_logging(config).unwrap_or_default()
    });
}

pub fn scraped_at() -> DateTime<Local> {
    Local.with_ymd_and_hms(2023, 2, 14, 18, 30, 0).unwrap()
}

pub fn record(source: &str, video_id: &str, length: &str) -> ResultRecord {
    ResultRecord {
        scraped_at: scraped_at(),
        page_number: 1,
        age_display: "vor 3 Stunden".to_string(),
        age_seconds: 10_800,
        source: source.to_string(),
        title: format!("Video {video_id}"),
        video_id: video_id.to_string(),
        length: length.to_string(),
    }
}
