use chrono::{DateTime, FixedOffset, Offset, Utc};
use forecast_core::Report;

const DATE_TIME: &str = "%d/%b/%Y - %H:%M";
const DATE: &str = "%d/%b/%Y";

/// Plain-text summary of a normalized report, in the location's UTC offset.
pub fn report(report: &Report, api_calls: u64) -> String {
    let tz = location_offset(report.offset);
    let mut lines = vec![
        format!("API Calls made today: {api_calls}"),
        format!(
            "Latitude: {:.2}  Longitude: {:.2}  Timezone: {}",
            report.latitude, report.longitude, report.timezone
        ),
    ];

    if let Some(c) = &report.currently {
        lines.push("Current Weather -".to_string());
        lines.push(format!(
            "Report Time: {}  Summary: {}",
            at(c.time, tz, DATE_TIME),
            text(&c.conditions.summary)
        ));
        lines.push(format!(
            "Temperature: {}°  Pressure: {}mb  Humidity: {}%",
            num(c.temperature, 0),
            num(c.conditions.pressure, 0),
            num(c.conditions.humidity.map(|h| h * 100.0), 0)
        ));
    }

    if let Some(hourly) = report.hourly.as_ref().filter(|h| !h.data.is_empty()) {
        lines.push(format!("Hourly summary: {}", text(&hourly.summary)));
        for h in &hourly.data {
            lines.push(format!(
                "Time: {}  Temperature: {:>3}°  Pressure: {:>4}mb  - {}",
                at(h.time, tz, DATE_TIME),
                num(h.temperature, 0),
                num(h.conditions.pressure, 0),
                text(&h.conditions.summary)
            ));
        }
    }

    if let Some(daily) = report.daily.as_ref().filter(|d| !d.data.is_empty()) {
        lines.push(format!("Daily summary: {}", text(&daily.summary)));
        for d in &daily.data {
            lines.push(format!(
                "Time: {}  Temperature (Min/Max): {:>3}/{:>3}°  Pressure: {:>4}mb  - {}",
                at(d.time, tz, DATE),
                num(d.temperature_min, 0),
                num(d.temperature_max, 0),
                num(d.conditions.pressure, 0),
                text(&d.conditions.summary)
            ));
        }
    }

    for alert in report.alerts.iter().flatten() {
        lines.push(format!(
            "ALERT: {} (until {})",
            alert.title,
            at(alert.expires, tz, DATE_TIME)
        ));
        lines.push(format!("  {}", alert.uri));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn location_offset(hours: f64) -> FixedOffset {
    FixedOffset::east_opt((hours * 3600.0).round() as i32).unwrap_or_else(|| Utc.fix())
}

fn at(time: Option<DateTime<Utc>>, tz: FixedOffset, format: &str) -> String {
    time.map(|t| t.with_timezone(&tz).format(format).to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn num(value: Option<f64>, precision: usize) -> String {
    value.map(|v| format!("{v:.precision$}")).unwrap_or_else(|| "-".to_string())
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}
