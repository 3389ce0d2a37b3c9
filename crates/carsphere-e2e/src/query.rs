//! DOM queries: an immutable (strategy, expression) pair.
//!
//! A query only describes *how* to find elements; it never holds resolved
//! nodes. The waiter re-resolves a query on every poll attempt, so client-side
//! re-renders that replace DOM nodes are handled without stale references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lookup strategy for a [`ElementQuery`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Element id attribute
    Id,
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
    /// Tag name
    Tag,
    /// Class name
    Class,
}

impl Strategy {
    /// Short prefix used when rendering a query
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::Tag => "tag",
            Self::Class => "class",
        }
    }
}

/// An immutable query identifying zero or more DOM nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementQuery {
    strategy: Strategy,
    expression: String,
}

impl ElementQuery {
    /// Query by element id
    #[must_use]
    pub fn id(expression: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Id,
            expression: expression.into(),
        }
    }

    /// Query by CSS selector
    #[must_use]
    pub fn css(expression: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Css,
            expression: expression.into(),
        }
    }

    /// Query by XPath expression
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::XPath,
            expression: expression.into(),
        }
    }

    /// Query by tag name
    #[must_use]
    pub fn tag(expression: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Tag,
            expression: expression.into(),
        }
    }

    /// Query by class name
    #[must_use]
    pub fn class_name(expression: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Class,
            expression: expression.into(),
        }
    }

    /// The lookup strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The selector expression
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// JavaScript expression evaluating to an array of the matched nodes.
    ///
    /// The CDP backend embeds this in its resolve script; mock backends key
    /// off [`ElementQuery`] values directly and never evaluate it.
    #[must_use]
    pub fn to_collector_js(&self) -> String {
        let expr = &self.expression;
        match self.strategy {
            Strategy::Css => format!("Array.from(document.querySelectorAll({expr:?}))"),
            Strategy::Id => format!("[document.getElementById({expr:?})].filter(Boolean)"),
            Strategy::Tag => format!("Array.from(document.getElementsByTagName({expr:?}))"),
            Strategy::Class => format!("Array.from(document.getElementsByClassName({expr:?}))"),
            Strategy::XPath => format!(
                "(() => {{ const r = document.evaluate({expr:?}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; \
                 for (let i = 0; i < r.snapshotLength; i++) {{ out.push(r.snapshotItem(i)); }} \
                 return out; }})()"
            ),
        }
    }
}

impl fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.strategy.prefix(), self.expression)
    }
}
