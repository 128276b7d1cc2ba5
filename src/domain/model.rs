use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;

/// One (route, date) check. Lives for a single run only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteQuery {
    pub route: String,
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub url: String,
}

/// Page content captured after rendering: the HTML source and the visible body text.
#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    pub html: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Rendered(RenderedPage),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub query: RouteQuery,
    pub outcome: FetchOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability {
    Available {
        count: Option<usize>,
        details: Option<String>,
    },
    Unavailable,
    Unknown {
        reason: String,
    },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available { .. })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Availability::Unknown { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityResult {
    pub query: RouteQuery,
    pub availability: Availability,
}

impl AvailabilityResult {
    pub fn details(&self) -> Option<&str> {
        match &self.availability {
            Availability::Available { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub results: Vec<AvailabilityResult>,
}

impl Notification {
    /// Builds the alert from every positive result, in query order. `None` when nothing
    /// is available.
    pub fn from_results(results: &[AvailabilityResult]) -> Option<Self> {
        let available: Vec<AvailabilityResult> = results
            .iter()
            .filter(|r| r.availability.is_available())
            .cloned()
            .collect();

        if available.is_empty() {
            return None;
        }

        Some(Self {
            subject: format!("SAR Tickets Available! ({} trips found)", available.len()),
            text_body: render_text_body(&available),
            html_body: render_html_body(&available),
            results: available,
        })
    }
}

fn render_text_body(results: &[AvailabilityResult]) -> String {
    let mut body = String::from("SAR Train Tickets Available!\n\n");
    for result in results {
        let _ = writeln!(body, "Route: {}", result.query.route);
        let _ = writeln!(body, "Date: {}", result.query.date);
        let _ = writeln!(body, "Link: {}", result.query.url);
        if let Some(details) = result.details() {
            let _ = writeln!(body, "Details: {}", details);
        }
        body.push('\n');
    }
    body
}

const CELL_STYLE: &str = "padding: 10px; border: 1px solid #ddd;";

fn render_html_body(results: &[AvailabilityResult]) -> String {
    let mut html = String::from(
        "<html>\n<body style=\"font-family: Arial, sans-serif;\">\n\
         <h2 style=\"color: #2e7d32;\">SAR Train Tickets Available!</h2>\n\
         <p>The following train tickets are now available:</p>\n\
         <table style=\"border-collapse: collapse; width: 100%;\">\n",
    );
    let _ = writeln!(
        html,
        "<tr style=\"background-color: #e8f5e9;\"><th style=\"{s}\">Route</th><th style=\"{s}\">Date</th><th style=\"{s}\">Link</th></tr>",
        s = CELL_STYLE
    );

    for result in results {
        let _ = writeln!(
            html,
            "<tr><td style=\"{s}\">{route}</td><td style=\"{s}\">{date}</td><td style=\"{s}\"><a href=\"{url}\" style=\"color: #1976d2;\">Book Now</a></td></tr>",
            s = CELL_STYLE,
            route = escape_html(&result.query.route),
            date = result.query.date,
            url = escape_html(&result.query.url),
        );
    }

    html.push_str(
        "</table>\n<p style=\"margin-top: 20px; color: #666;\">\
         <strong>Note:</strong> Book quickly as tickets may sell out!</p>\n\
         </body>\n</html>\n",
    );
    html
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// How the load phase ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    NothingToReport,
    Sent { recipient: String, results: usize },
    Printed { results: usize },
    Failed { reason: String },
}

/// What a notifier did with the alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Emailed { recipient: String },
    Printed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub checked: usize,
    pub available: usize,
    pub unknown: usize,
    pub dispatch: DispatchOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(date: &str, availability: Availability) -> AvailabilityResult {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        AvailabilityResult {
            query: RouteQuery {
                route: "Riyadh to Qurayyat".to_string(),
                origin: "RIY".to_string(),
                destination: "QUR".to_string(),
                date,
                url: format!(
                    "https://tickets.sar.com.sa/select-trip?DepartureDateString={}&Lang=en",
                    date
                ),
            },
            availability,
        }
    }

    #[test]
    fn test_no_notification_without_positive_results() {
        let results = vec![
            result("2025-03-03", Availability::Unavailable),
            result(
                "2025-03-04",
                Availability::Unknown {
                    reason: "timeout".to_string(),
                },
            ),
        ];

        assert!(Notification::from_results(&results).is_none());
        assert!(Notification::from_results(&[]).is_none());
    }

    #[test]
    fn test_notification_lists_only_available_dates() {
        let results = vec![
            result("2025-03-03", Availability::Unavailable),
            result(
                "2025-03-04",
                Availability::Available {
                    count: Some(2),
                    details: Some("08:00 Riyadh -> 14:30 Qurayyat".to_string()),
                },
            ),
            result(
                "2025-03-05",
                Availability::Available {
                    count: None,
                    details: None,
                },
            ),
        ];

        let notification = Notification::from_results(&results).unwrap();

        assert_eq!(notification.subject, "SAR Tickets Available! (2 trips found)");
        assert_eq!(notification.results.len(), 2);
        assert!(notification.text_body.starts_with("SAR Train Tickets Available!"));
        assert!(notification.text_body.contains("Date: 2025-03-04"));
        assert!(notification.text_body.contains("Date: 2025-03-05"));
        assert!(!notification.text_body.contains("2025-03-03"));
        assert!(notification
            .text_body
            .contains("Details: 08:00 Riyadh -> 14:30 Qurayyat"));
        assert!(notification.html_body.contains("Book Now"));
    }

    #[test]
    fn test_html_body_escapes_values() {
        let mut positive = result(
            "2025-03-04",
            Availability::Available {
                count: Some(1),
                details: None,
            },
        );
        positive.query.route = "Riyadh <Main> to Qurayyat".to_string();

        let notification = Notification::from_results(&[positive]).unwrap();

        assert!(notification.html_body.contains("Riyadh &lt;Main&gt; to Qurayyat"));
        assert!(notification.html_body.contains("DepartureDateString=2025-03-04&amp;Lang=en"));
        assert!(!notification.html_body.contains("<Main>"));
    }
}
