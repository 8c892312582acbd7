//! Styles, selectors, and style sheets.
//!
//! A [`Style`] is a named bundle of rendering symbology, opaque to the
//! rendering core beyond its identity: interpretation is entirely the
//! rasterizer's business. A [`StyleSheet`] maps names to styles, carries an
//! ordered list of [`StyleSelector`]s, and designates a default style.
//! When selectors are present they govern rendering; the default style is
//! used only when no selectors exist.

use crate::feature::Query;
use std::collections::BTreeMap;

/// A named symbology bundle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    name: String,
    symbology: String,
}

impl Style {
    /// Create a named style with empty symbology.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbology: String::new(),
        }
    }

    /// Neutral unnamed style; delegates all visual decisions to the
    /// rasterizer.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach symbology.
    pub fn with_symbology(mut self, symbology: impl Into<String>) -> Self {
        self.symbology = symbology.into();
        self
    }

    /// Style name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque symbology payload.
    pub fn symbology(&self) -> &str {
        &self.symbology
    }
}

/// Pairs a named style with the sub-query selecting the features it
/// applies to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSelector {
    style_name: String,
    query: Query,
}

impl StyleSelector {
    /// Create a selector.
    pub fn new(style_name: impl Into<String>, query: Query) -> Self {
        Self {
            style_name: style_name.into(),
            query,
        }
    }

    /// Name of the style this selector applies.
    pub fn style_name(&self) -> &str {
        &self.style_name
    }

    /// Sub-query selecting the features.
    pub fn query(&self) -> &Query {
        &self.query
    }
}

/// Zero or more named styles, an ordered selector list, and a default
/// style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    styles: BTreeMap<String, Style>,
    selectors: Vec<StyleSelector>,
    default_style: Style,
}

impl StyleSheet {
    /// Empty sheet with a neutral default style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.styles.insert(style.name().to_string(), style);
        self
    }

    /// Append a selector; order is evaluation order.
    pub fn with_selector(mut self, selector: StyleSelector) -> Self {
        self.selectors.push(selector);
        self
    }

    /// Set the default style.
    pub fn with_default_style(mut self, style: Style) -> Self {
        self.default_style = style;
        self
    }

    /// Look up a style by name.
    pub fn style(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    /// The designated default style.
    pub fn default_style(&self) -> &Style {
        &self.default_style
    }

    /// Ordered selector list.
    pub fn selectors(&self) -> &[StyleSelector] {
        &self.selectors
    }

    /// Selector indices and names that do not resolve to a style in this
    /// sheet. A caller configuration defect, surfaced once at layer setup
    /// rather than rediscovered per tile.
    pub fn unresolved_selectors(&self) -> Vec<(usize, &str)> {
        self.selectors
            .iter()
            .enumerate()
            .filter(|(_, sel)| !self.styles.contains_key(sel.style_name()))
            .map(|(i, sel)| (i, sel.style_name()))
            .collect()
    }
}
