//! Inline `style` attributes as an ordered property list.
//!
//! `fill:#000000;stroke:none;stroke-width:0.26` parses into three entries, in
//! that order. Updating an entry keeps its position; new entries are appended.

use indexmap::IndexMap;
use std::fmt;

pub const STYLE_ATTRIBUTE: &str = "style";

/// Value meaning "property explicitly disabled". Non-forced updates skip it.
pub const NONE_VALUE: &str = "none";

/// The style properties this crate knows how to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Fill,
    Stroke,
    FillOpacity,
    StrokeOpacity,
    Display,
}

impl Property {
    pub fn key(self) -> &'static str {
        match self {
            Property::Fill => "fill",
            Property::Stroke => "stroke",
            Property::FillOpacity => "fill-opacity",
            Property::StrokeOpacity => "stroke-opacity",
            Property::Display => "display",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    entries: IndexMap<String, String>,
}

impl Style {
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .split(';')
            .filter_map(|item| {
                let (key, value) = item.split_once(':')?;
                let key = key.trim();
                if key.is_empty() {
                    return None;
                }
                Some((key.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Applies the force policy and reports whether anything changed.
    ///
    /// With `force` the key is always written. Without it the key is only
    /// rewritten when present and not `none`.
    pub fn update(&mut self, key: &str, value: &str, force: bool) -> bool {
        let applies = force
            || self
                .entries
                .get(key)
                .is_some_and(|current| current != NONE_VALUE);
        if applies {
            self.set(key, value);
        }
        applies
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}:{}", key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_order() {
        let style = Style::parse("stroke:none;fill:#000000;stroke-width:0.26");
        let keys: Vec<_> = style.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["stroke", "fill", "stroke-width"]);
        assert_eq!(style.to_string(), "stroke:none;fill:#000000;stroke-width:0.26");
    }

    #[test]
    fn parse_tolerates_whitespace_and_trailing_separator() {
        let style = Style::parse(" fill : red ; ;stroke:blue;");
        assert_eq!(style.get("fill"), Some("red"));
        assert_eq!(style.to_string(), "fill:red;stroke:blue");
    }

    #[test]
    fn values_may_contain_colons() {
        let style = Style::parse("fill:url(#paint:1);stroke:none");
        assert_eq!(style.get("fill"), Some("url(#paint:1)"));
        assert_eq!(style.to_string(), "fill:url(#paint:1);stroke:none");
    }

    #[test]
    fn empty_style() {
        let style = Style::parse("");
        assert!(style.is_empty());
        assert_eq!(style.to_string(), "");
    }

    #[test]
    fn set_existing_key_keeps_position() {
        let mut style = Style::parse("fill:red;stroke:blue");
        style.set("fill", "green");
        style.set("opacity", "1");
        assert_eq!(style.to_string(), "fill:green;stroke:blue;opacity:1");
    }

    #[test]
    fn update_without_force_skips_missing_and_none() {
        let mut style = Style::parse("fill:none;stroke:#123456");
        assert!(!style.update("fill", "#FF0000", false));
        assert!(!style.update("fill-opacity", "1", false));
        assert!(style.update("stroke", "#FF0000", false));
        assert_eq!(style.to_string(), "fill:none;stroke:#FF0000");
    }

    #[test]
    fn update_with_force_always_writes() {
        let mut style = Style::parse("fill:none");
        assert!(style.update("fill", "#FF0000", true));
        assert!(style.update("stroke", "#00FF00", true));
        assert_eq!(style.to_string(), "fill:#FF0000;stroke:#00FF00");
    }
}
