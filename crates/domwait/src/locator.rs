// Locator - A stateless, reusable predicate over the current DOM snapshot
//
// Locators are values, not element handles: they can be held across
// navigations, retried, and composed into ordered fallback lists. Resolution
// happens at action time inside the wait engine, never at construction time.

use std::fmt;

/// A predicate the engine can resolve against the live DOM.
///
/// Four shapes cover what the target flows need:
/// exact visible text, raw CSS, raw XPath, and attribute equality.
/// Ordered fallback lists are plain slices (`&[Locator]`) consumed by
/// [`Session::click_first_match`](crate::Session::click_first_match).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Matches any element whose normalized text equals the string exactly.
    Text(String),
    /// Raw CSS selector, passed through to the driver.
    Css(String),
    /// Raw XPath expression, passed through to the driver.
    XPath(String),
    /// Matches elements carrying `name="value"` exactly.
    Attr { name: String, value: String },
}

impl Locator {
    pub fn text(text: impl Into<String>) -> Self {
        Locator::Text(text.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Locator::XPath(expr.into())
    }

    pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Self {
        Locator::Attr {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The XPath a `Text` locator compiles to.
    ///
    /// `normalize-space` makes the match robust against layout whitespace,
    /// mirroring how the target UI renders labels.
    pub fn text_xpath(text: &str) -> String {
        format!("//*[normalize-space(text())={}]", xpath_literal(text))
    }

    /// The CSS selector an `Attr` locator compiles to.
    pub fn attr_css(name: &str, value: &str) -> String {
        format!("[{}={}]", name, css_string_literal(value))
    }

    /// Human-readable form used in timeout and assertion messages.
    pub fn describe(&self) -> String {
        match self {
            Locator::Text(t) => format!("text '{}'", t),
            Locator::Css(s) => format!("css '{}'", s),
            Locator::XPath(x) => format!("xpath '{}'", x),
            Locator::Attr { name, value } => format!("[{}='{}']", name, value),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Quotes a string as an XPath literal.
///
/// XPath 1.0 has no escape sequences inside string literals, so a value
/// containing both quote kinds must be assembled with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    let mut parts = Vec::new();
    for (i, chunk) in value.split('"').enumerate() {
        if i > 0 {
            parts.push("'\"'".to_string());
        }
        if !chunk.is_empty() {
            parts.push(format!("\"{}\"", chunk));
        }
    }
    format!("concat({})", parts.join(", "))
}

/// Quotes a string for use inside a CSS attribute selector.
fn css_string_literal(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Removes one layer of wrapping quotes from an externally supplied selector.
///
/// Selector strings arrive through environment variables where shells and
/// `.env` files often leave `"..."` or `'...'` around the value. Anything
/// else passes through untouched.
pub fn strip_wrapping_quotes(s: &str) -> &str {
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        let (first, last) = (bytes[0], bytes[s.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}
