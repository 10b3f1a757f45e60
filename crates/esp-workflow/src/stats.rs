//! Summing and formatting statistics records for the console

use esp_client::{DailyStats, StatsCounters};

/// Sum per-day records into one set of counters.
pub fn sum_days(days: &[DailyStats]) -> StatsCounters {
    days.iter()
        .fold(StatsCounters::default(), |mut total, day| {
            total += &day.counters;
            total
        })
}

/// One-line rendering: `processed=3 delivered=2 ... [opens=1 clicks=0]`.
pub fn format_counters(counters: &StatsCounters) -> String {
    let mut line = format!(
        "processed={} delivered={} dropped={} hard_bounced={} soft_bounced={} unsubscribed={} spam={}",
        counters.processed,
        counters.delivered,
        counters.dropped,
        counters.hard_bounced,
        counters.soft_bounced,
        counters.unsubscribed,
        counters.spam,
    );
    if let Some(opens) = counters.opens {
        line.push_str(&format!(" opens={opens}"));
    }
    if let Some(clicks) = counters.clicks {
        line.push_str(&format!(" clicks={clicks}"));
    }
    line
}

/// Per-day rows followed by the summed total.
pub fn daily_lines(days: &[DailyStats]) -> Vec<String> {
    if days.is_empty() {
        return vec!["no activity in window".to_string()];
    }
    let mut lines: Vec<String> = days
        .iter()
        .map(|day| format!("{}: {}", day.date, format_counters(&day.counters)))
        .collect();
    lines.push(format!("total: {}", format_counters(&sum_days(days))));
    lines
}
