use crate::config::settings::DetectionSettings;
use crate::domain::model::{Availability, RenderedPage};
use crate::utils::error::{MonitorError, Result};
use scraper::{ElementRef, Html, Node, Selector};

const BOOK_DETAILS: &str = "Book buttons found - tickets likely available";
const PRICE_DETAILS: &str = "Price elements found - tickets likely available";
const NO_INDICATOR_DETAILS: &str = "no sold-out indicator on rendered page";

/// Reads seat availability out of a rendered booking page.
///
/// Checks run in a fixed order: empty page, sold-out text, trip elements, Book buttons,
/// price elements. The first one that decides wins.
pub struct AvailabilityDetector {
    unavailable_indicators: Vec<String>,
    trip_selectors: Vec<Selector>,
    book_selector: Selector,
    book_label: String,
    price_selector: Option<Selector>,
    details_max_chars: usize,
    require_structural_cue: bool,
}

impl AvailabilityDetector {
    pub fn new(settings: &DetectionSettings) -> Result<Self> {
        Ok(Self {
            unavailable_indicators: settings
                .unavailable_indicators
                .iter()
                .map(|s| s.to_lowercase())
                .filter(|s| !s.trim().is_empty())
                .collect(),
            trip_selectors: parse_selectors(&settings.trip_selectors)?,
            book_selector: parse_selector(&settings.book_selector)?,
            book_label: collapse_whitespace(&settings.book_label).to_lowercase(),
            // one combined selector so an element matching several patterns counts once
            price_selector: combined_selector(&settings.price_selectors)?,
            details_max_chars: settings.details_max_chars,
            require_structural_cue: settings.require_structural_cue,
        })
    }

    pub fn detect(&self, page: &RenderedPage) -> Availability {
        if page.text.trim().is_empty() {
            return Availability::Unknown {
                reason: "rendered page had no content".to_string(),
            };
        }

        let text = page.text.to_lowercase();
        if let Some(indicator) = self
            .unavailable_indicators
            .iter()
            .find(|indicator| text.contains(indicator.as_str()))
        {
            tracing::debug!("Found unavailable indicator '{}'", indicator);
            return Availability::Unavailable;
        }

        let document = Html::parse_document(&page.html);

        for selector in &self.trip_selectors {
            let trips: Vec<ElementRef> = document.select(selector).collect();
            if let Some(first) = trips.first() {
                let details = truncate_chars(&collapse_whitespace(&element_text(first)), self.details_max_chars);
                return Availability::Available {
                    count: Some(trips.len()),
                    details: (!details.is_empty()).then_some(details),
                };
            }
        }

        let book_buttons = document
            .select(&self.book_selector)
            .filter(|el| {
                collapse_whitespace(&element_text(el))
                    .to_lowercase()
                    .contains(self.book_label.as_str())
            })
            .count();
        if book_buttons > 0 {
            return Availability::Available {
                count: Some(book_buttons),
                details: Some(BOOK_DETAILS.to_string()),
            };
        }

        let prices = self
            .price_selector
            .as_ref()
            .map_or(0, |selector| document.select(selector).count());
        if prices > 0 {
            return Availability::Available {
                count: Some(prices),
                details: Some(PRICE_DETAILS.to_string()),
            };
        }

        if self.require_structural_cue {
            Availability::Unavailable
        } else {
            Availability::Available {
                count: None,
                details: Some(NO_INDICATOR_DETAILS.to_string()),
            }
        }
    }
}

fn parse_selector(raw: &str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| MonitorError::InvalidConfigValueError {
        field: "detection".to_string(),
        value: raw.to_string(),
        reason: format!("Invalid CSS selector: {:?}", e),
    })
}

fn parse_selectors(raw: &[String]) -> Result<Vec<Selector>> {
    raw.iter().map(|s| parse_selector(s)).collect()
}

fn combined_selector(raw: &[String]) -> Result<Option<Selector>> {
    let parts: Vec<&str> = raw.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    if parts.is_empty() {
        return Ok(None);
    }
    parse_selector(&parts.join(", ")).map(Some)
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(raw: &str, max_chars: usize) -> String {
    raw.chars().take(max_chars).collect()
}

/// Visible text of an HTML document's body. Skips script, style and noscript content,
/// roughly what a browser reports as `innerText`.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    let root = body.unwrap_or_else(|| document.root_element());

    let mut parts = Vec::new();
    for node in root.descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| matches!(el.name(), "script" | "style" | "noscript"))
            });
            let trimmed = text.trim();
            if !hidden && !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
    }

    parts.join("\n")
}
