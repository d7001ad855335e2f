// Locator - Immutable description of how to find an element
//
// A locator is a (strategy, expression) pair. It is never bound to an element
// instance: the UI re-renders freely, so every poll resolves it again.
//
// Locators are cheap to clone (the expression is reference-counted) and have
// no setters. Building one from semantic parameters is done with plain
// functions (see `panel::locators`).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Strategy used to interpret a locator expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectBy {
    /// CSS selector, e.g. `[data-testid='data-testid panel content']`
    Css,
    /// XPath 1.0 expression, e.g. `//*[text()="No data"]`
    #[serde(rename = "xpath")]
    XPath,
}

impl SelectBy {
    /// Selector engine prefix understood by Playwright-style drivers.
    pub fn engine(&self) -> &'static str {
        match self {
            SelectBy::Css => "css",
            SelectBy::XPath => "xpath",
        }
    }
}

impl fmt::Display for SelectBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.engine())
    }
}

/// Locator describes how to find an element on the page at any given moment.
///
/// # Example
///
/// ```ignore
/// use uisync::{Locator, SelectBy};
///
/// let status = Locator::css("#status");
/// assert_eq!(status.strategy(), SelectBy::Css);
/// assert_eq!(status.to_string(), "css=#status");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    strategy: SelectBy,
    expression: Arc<str>,
}

impl Locator {
    /// Creates a locator from an explicit strategy.
    pub fn new(strategy: SelectBy, expression: impl Into<String>) -> Self {
        Self {
            strategy,
            expression: Arc::from(expression.into()),
        }
    }

    /// Creates a CSS selector locator.
    pub fn css(expression: impl Into<String>) -> Self {
        Self::new(SelectBy::Css, expression)
    }

    /// Creates an XPath locator.
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::new(SelectBy::XPath, expression)
    }

    /// Returns the strategy of this locator
    pub fn strategy(&self) -> SelectBy {
        self.strategy
    }

    /// Returns the raw expression of this locator
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns the engine-prefixed selector, e.g. `xpath=//button`.
    pub fn selector(&self) -> String {
        format!("{}={}", self.strategy.engine(), self.expression)
    }

    /// Checks that the expression can possibly compile for its strategy.
    ///
    /// This is a syntactic pre-flight check only. It catches the mistakes
    /// that would otherwise surface as a driver error on every poll:
    /// empty expressions, unterminated string literals, unbalanced
    /// brackets, and dangling path steps or combinators.
    pub fn validate(&self) -> Result<()> {
        let expression = self.expression.trim();
        if expression.is_empty() {
            return Err(self.malformed("empty expression"));
        }

        let skeleton = strip_literals(expression, self.strategy == SelectBy::Css)
            .map_err(|reason| self.malformed(reason))?;

        match self.strategy {
            SelectBy::XPath => {
                if skeleton.ends_with('/') && skeleton != "/" {
                    return Err(self.malformed("path ends with a step separator"));
                }
                if skeleton.contains("///") {
                    return Err(self.malformed("empty location step"));
                }
                if skeleton.contains("[]") {
                    return Err(self.malformed("empty predicate"));
                }
            }
            SelectBy::Css => {
                if skeleton.starts_with(',') || skeleton.ends_with(',') {
                    return Err(self.malformed("empty selector in selector list"));
                }
                if skeleton.ends_with(['>', '+', '~']) {
                    return Err(self.malformed("combinator without a right-hand selector"));
                }
            }
        }

        Ok(())
    }

    fn malformed(&self, reason: impl Into<String>) -> Error {
        Error::MalformedLocator {
            locator: self.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.expression)
    }
}

/// Scans an expression for unterminated quotes and unbalanced brackets.
///
/// Returns the expression with every string literal emptied (`'a[]'`
/// becomes `''`), so structural checks never look inside quoted values.
///
/// CSS allows backslash escapes outside and inside strings; XPath 1.0 has no
/// escape character, a quote is closed by the next quote of the same kind.
fn strip_literals(
    expression: &str,
    backslash_escapes: bool,
) -> std::result::Result<String, String> {
    let mut skeleton = String::with_capacity(expression.len());
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = expression.chars();

    while let Some(c) = chars.next() {
        if backslash_escapes && c == '\\' {
            chars.next();
            if quote.is_none() {
                // An escaped character is part of an identifier
                skeleton.push('_');
            }
            continue;
        }

        if let Some(open) = quote {
            if c == open {
                quote = None;
                skeleton.push(c);
            }
            continue;
        }

        skeleton.push(c);
        match c {
            '\'' | '"' => quote = Some(c),
            '[' | '(' => stack.push(c),
            ']' | ')' => {
                let expected = if c == ']' { '[' } else { '(' };
                match stack.pop() {
                    Some(open) if open == expected => {}
                    Some(open) => return Err(format!("'{}' closed by '{}'", open, c)),
                    None => return Err(format!("unexpected '{}'", c)),
                }
            }
            _ => {}
        }
    }

    if let Some(open) = quote {
        return Err(format!("unterminated string literal starting with {}", open));
    }
    if let Some(open) = stack.pop() {
        return Err(format!("unclosed '{}'", open));
    }
    Ok(skeleton)
}

/// Quotes `value` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so a value containing both quote kinds is
/// split and joined back with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }

    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}
