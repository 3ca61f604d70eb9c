//! Trailhead module/unit metadata

use crate::extract::strategies::PageSnapshot;

const MODULE_TITLE: &str = ".module-title, .tds-module-name";
const UNIT_TITLE: &str = ".unit-title, .tds-unit-name";
const POINTS: &str = ".tds-badge-points, .badge-points";
const ESTIMATED_TIME: &str = ".estimated-time, .tds-estimated-time";

/// Metadata shown around a Trailhead unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrailheadMeta {
    pub module_title: Option<String>,
    pub unit_title: Option<String>,
    pub points: Option<String>,
    pub estimated_time: Option<String>,
    pub content_type: Option<&'static str>,
}

impl TrailheadMeta {
    pub fn from_snapshot(snapshot: &PageSnapshot, url: &str) -> Self {
        Self {
            module_title: snapshot.text_of(MODULE_TITLE),
            unit_title: snapshot.text_of(UNIT_TITLE),
            points: snapshot.text_of(POINTS),
            estimated_time: snapshot.text_of(ESTIMATED_TIME),
            content_type: content_type(url),
        }
    }

    /// "module - unit", or whichever of the two exists
    pub fn title(&self) -> Option<String> {
        match (&self.module_title, &self.unit_title) {
            (Some(module), Some(unit)) => Some(format!("{} - {}", module, unit)),
            (Some(module), None) => Some(module.clone()),
            (None, Some(unit)) => Some(unit.clone()),
            (None, None) => None,
        }
    }

    /// Frontmatter fields, in output order
    pub fn into_fields(self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("trailhead".to_string(), "true".to_string()),
            ("module_title".to_string(), self.module_title.unwrap_or_default()),
            ("unit_title".to_string(), self.unit_title.unwrap_or_default()),
        ];
        if let Some(points) = self.points {
            fields.push(("points".to_string(), points));
        }
        if let Some(time) = self.estimated_time {
            fields.push(("estimated_time".to_string(), time));
        }
        if let Some(kind) = self.content_type {
            fields.push(("type".to_string(), kind.to_string()));
        }
        fields
    }
}

/// Content type from the URL path segment
fn content_type(url: &str) -> Option<&'static str> {
    if url.contains("modules") {
        Some("module")
    } else if url.contains("trails") {
        Some("trail")
    } else if url.contains("projects") {
        Some("project")
    } else {
        None
    }
}
