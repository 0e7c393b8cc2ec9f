//! Region selectors: which annotated element to use as the target region.
//!
//! Accepted forms:
//! - `key=value`, e.g. `entity=signature`
//! - `value` alone, matching any property key
//! - the XPath shapes used with PAGE tooling, e.g.
//!   `//*[_:Property[@key="entity" and @value="signature"]]` or
//!   `//_:TextRegion[_:Property/@value="sketch"]/_:Coords`

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::AnnotationError;

static RE_XPATH_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^//(?:[A-Za-z_][\w.-]*:)?([A-Za-z_*][\w.-]*)").unwrap());
static RE_XPATH_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"@key\s*=\s*["']([^"']*)["']"#).unwrap());
static RE_XPATH_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"@value\s*=\s*["']([^"']*)["']"#).unwrap());

/// Matches an element by its `Property` children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSelector {
    /// Local element name, or `None` for any element.
    pub element: Option<String>,
    /// Property key, or `None` for any key.
    pub key: Option<String>,
    pub value: String,
}

impl RegionSelector {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            element: None,
            key: Some(key.into()),
            value: value.into(),
        }
    }

    /// A `TextRegion` carrying a property with `value` under any key.
    pub fn text_region(value: impl Into<String>) -> Self {
        Self {
            element: Some("TextRegion".into()),
            key: None,
            value: value.into(),
        }
    }

    /// Whether an element named `element` with `properties` is selected.
    pub fn matches(&self, element: &str, properties: &[(String, String)]) -> bool {
        if let Some(want) = &self.element {
            if want != element {
                return false;
            }
        }
        properties.iter().any(|(k, v)| {
            v == &self.value && self.key.as_ref().is_none_or(|want| want == k)
        })
    }

    fn parse_xpath(s: &str) -> Result<Self, AnnotationError> {
        let value = RE_XPATH_VALUE
            .captures(s)
            .map(|c| c[1].to_string())
            .ok_or_else(|| AnnotationError::InvalidSelector(s.to_string()))?;
        let key = RE_XPATH_KEY.captures(s).map(|c| c[1].to_string());
        let element = RE_XPATH_ELEMENT
            .captures(s)
            .map(|c| c[1].to_string())
            .filter(|e| e != "*");
        Ok(Self {
            element,
            key,
            value,
        })
    }
}

impl Default for RegionSelector {
    fn default() -> Self {
        Self::new("entity", "signature")
    }
}

impl FromStr for RegionSelector {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('/') {
            return Self::parse_xpath(s);
        }

        let (key, value) = match s.split_once('=') {
            Some((k, v)) => (Some(k.trim()), v.trim()),
            None => (None, s),
        };
        if value.is_empty() || key.is_some_and(str::is_empty) {
            return Err(AnnotationError::InvalidSelector(s.to_string()));
        }

        Ok(Self {
            element: None,
            key: key.map(str::to_string),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for RegionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(element) = &self.element {
            write!(f, "{element}:")?;
        }
        match &self.key {
            Some(key) => write!(f, "{key}={}", self.value),
            None => f.write_str(&self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_key_value() {
        let sel: RegionSelector = "entity=signature".parse().unwrap();
        assert_eq!(sel, RegionSelector::default());
        assert_eq!(sel.to_string(), "entity=signature");
    }

    #[test]
    fn test_parse_bare_value() {
        let sel: RegionSelector = "sketch".parse().unwrap();
        assert_eq!(sel.key, None);
        assert_eq!(sel.value, "sketch");
    }

    #[test]
    fn test_parse_xpath_forms() {
        let sel: RegionSelector = r#"//*[_:Property[@key="entity" and @value="signature"]]"#
            .parse()
            .unwrap();
        assert_eq!(sel, RegionSelector::new("entity", "signature"));

        let sel: RegionSelector = r#"//_:TextRegion[_:Property/@value="sketch"]/_:Coords"#
            .parse()
            .unwrap();
        assert_eq!(sel, RegionSelector::text_region("sketch"));
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<RegionSelector>().is_err());
        assert!("entity=".parse::<RegionSelector>().is_err());
        assert!("=signature".parse::<RegionSelector>().is_err());
        assert!("//*[_:Property]".parse::<RegionSelector>().is_err());
    }

    #[test]
    fn test_matches() {
        let sel = RegionSelector::new("entity", "signature");
        assert!(sel.matches("TextRegion", &props(&[("entity", "signature")])));
        assert!(!sel.matches("TextRegion", &props(&[("type", "signature")])));
        assert!(!sel.matches("TextRegion", &props(&[("entity", "sketch")])));

        let any_key = RegionSelector::text_region("sketch");
        assert!(any_key.matches("TextRegion", &props(&[("type", "sketch")])));
        assert!(!any_key.matches("GraphicRegion", &props(&[("type", "sketch")])));
    }
}
