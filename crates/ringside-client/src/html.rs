//! Small helpers over `scraper` shared by the page extractors.

use ringside_core::error::AppError;
use scraper::{ElementRef, Selector};

/// Parse a CSS selector; failures are reported as page errors.
pub(crate) fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| AppError::MalformedPage(format!("invalid selector '{css}': {e}")))
}

/// All text under `element`, whitespace-collapsed and trimmed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First descendant of `element` matching `selector`.
pub(crate) fn first<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Text of the first descendant matching `selector`, if present and non-empty.
pub(crate) fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    first(element, selector)
        .map(element_text)
        .filter(|t| !t.is_empty())
}
