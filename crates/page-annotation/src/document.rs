//! Lightweight PAGE-XML reader.
//!
//! Only the parts needed to locate regions are read: the page
//! `imageFilename`, and every element that has a `Coords` child together
//! with its `Property` children. Tags are scanned with regular expressions;
//! there is no schema validation.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use image::RgbImage;
use image_processor::{Point, Rect};
use regex::Regex;
use tracing::debug;

use crate::selector::RegionSelector;
use crate::{AnnotationError, RegionSource};

static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)(?:[A-Za-z_][\w.-]*:)?([A-Za-z_][\w.-]*)((?:[^>/]|/[^>])*)(/?)>").unwrap()
});
static RE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:[A-Za-z_][\w.-]*:)?([A-Za-z_][\w.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// An annotated element with a polygon outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Local element name, e.g. `TextRegion`.
    pub element: String,
    pub id: Option<String>,
    pub properties: Vec<(String, String)>,
    pub points: Vec<Point>,
}

/// A parsed PAGE-XML document.
#[derive(Debug, Clone)]
pub struct PageDocument {
    base_dir: PathBuf,
    image_filename: Option<String>,
    regions: Vec<Region>,
}

/// Element being assembled while its end tag is pending.
#[derive(Default)]
struct OpenElement {
    order: usize,
    name: String,
    id: Option<String>,
    properties: Vec<(String, String)>,
    points: Option<Vec<Point>>,
}

impl PageDocument {
    /// Read and parse a PAGE-XML file. Image paths resolve against its directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AnnotationError> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        debug!(path = %path.display(), "Opening PAGE-XML");
        Self::parse(&xml, base_dir)
    }

    /// Open `source` as a file if it exists, otherwise parse it as XML text.
    pub fn load(source: &str) -> Result<Self, AnnotationError> {
        if Path::new(source).exists() {
            Self::open(source)
        } else {
            Self::parse(source, PathBuf::new())
        }
    }

    /// Parse PAGE-XML text.
    pub fn parse(xml: &str, base_dir: impl Into<PathBuf>) -> Result<Self, AnnotationError> {
        let xml = RE_COMMENT.replace_all(xml, "");
        let mut stack: Vec<OpenElement> = Vec::new();
        let mut finished: Vec<(usize, Region)> = Vec::new();
        let mut image_filename = None;

        for (order, cap) in RE_TAG.captures_iter(&xml).enumerate() {
            let closing = !cap[1].is_empty();
            let name = &cap[2];
            let self_closing = !cap[4].is_empty();

            if closing {
                if let Some(open) = stack.pop() {
                    close_element(open, &mut finished);
                }
                continue;
            }

            let attrs = parse_attrs(&cap[3]);
            let attr = |k: &str| {
                attrs
                    .iter()
                    .find(|(name, _)| name == k)
                    .map(|(_, v)| v.clone())
            };

            match name {
                "Page" if image_filename.is_none() => image_filename = attr("imageFilename"),
                "Property" => {
                    if let (Some(parent), Some(key)) = (stack.last_mut(), attr("key")) {
                        parent.properties.push((key, attr("value").unwrap_or_default()));
                    }
                }
                "Coords" => {
                    if let (Some(parent), Some(points)) = (stack.last_mut(), attr("points")) {
                        parent.points = Some(parse_points(&points)?);
                    }
                }
                _ => {}
            }

            let element = OpenElement {
                order,
                name: name.to_string(),
                id: attr("id"),
                ..OpenElement::default()
            };
            if self_closing {
                close_element(element, &mut finished);
            } else {
                stack.push(element);
            }
        }

        // Regions are kept in document order of their start tags.
        finished.sort_by_key(|(order, _)| *order);
        let regions: Vec<Region> = finished.into_iter().map(|(_, r)| r).collect();
        debug!(regions = regions.len(), ?image_filename, "Parsed PAGE-XML");

        Ok(Self {
            base_dir: base_dir.into(),
            image_filename,
            regions,
        })
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// First region matching `selector`.
    pub fn select(&self, selector: &RegionSelector) -> Result<&Region, AnnotationError> {
        self.regions
            .iter()
            .find(|r| selector.matches(&r.element, &r.properties))
            .ok_or_else(|| AnnotationError::NoMatch(selector.to_string()))
    }

    /// Bounding quad of the first region matching `selector`.
    pub fn region_quad(&self, selector: &RegionSelector) -> Result<[Point; 4], AnnotationError> {
        let region = self.select(selector)?;
        points_bbox(&region.points)
            .ok_or_else(|| AnnotationError::MalformedPoints(format!("{selector}: no points")))
    }

    pub fn image_filename(&self) -> Option<&str> {
        self.image_filename.as_deref()
    }

    /// Use a different page image than the one named in the document.
    pub fn set_image_filename(&mut self, filename: impl Into<String>) {
        self.image_filename = Some(filename.into());
    }

    /// Decode the page image as 8-bit RGB.
    pub fn load_image(&self) -> Result<RgbImage, AnnotationError> {
        let path = RegionSource::image_path(self)?;
        debug!(path = %path.display(), "Loading page image");
        Ok(image::open(&path)?.to_rgb8())
    }
}

impl RegionSource for PageDocument {
    fn region_rect(&self, selector: &RegionSelector) -> Result<Rect, AnnotationError> {
        Ok(Rect::from_quad(&self.region_quad(selector)?))
    }

    fn image_path(&self) -> Result<PathBuf, AnnotationError> {
        let name = self
            .image_filename
            .as_deref()
            .ok_or(AnnotationError::MissingImageFilename)?;
        Ok(self.base_dir.join(name))
    }
}

/// Axis-aligned bounding box of `points` as top-left, top-right,
/// bottom-right, bottom-left corners. `None` for an empty slice.
pub fn points_bbox(points: &[Point]) -> Option<[Point; 4]> {
    let first = points.first()?;
    let (mut min, mut max) = (*first, *first);
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some(Rect::new(min.x, min.y, max.x, max.y).corners())
}

fn close_element(open: OpenElement, finished: &mut Vec<(usize, Region)>) {
    let Some(points) = open.points else {
        return;
    };
    finished.push((
        open.order,
        Region {
            element: open.name,
            id: open.id,
            properties: open.properties,
            points,
        },
    ));
}

fn parse_attrs(raw: &str) -> Vec<(String, String)> {
    RE_ATTR
        .captures_iter(raw)
        .map(|c| {
            let value = c.get(2).or_else(|| c.get(3)).map_or("", |m| m.as_str());
            (c[1].to_string(), unescape(value))
        })
        .collect()
}

fn parse_points(raw: &str) -> Result<Vec<Point>, AnnotationError> {
    raw.split_whitespace()
        .map(|pair| {
            let malformed = || AnnotationError::MalformedPoints(pair.to_string());
            let (x, y) = pair.split_once(',').ok_or_else(malformed)?;
            let x: f64 = x.trim().parse().map_err(|_| malformed())?;
            let y: f64 = y.trim().parse().map_err(|_| malformed())?;
            Ok(Point::new(x as i32, y as i32))
        })
        .collect()
}

fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
