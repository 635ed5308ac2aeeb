//! The annotation record handed to the persistence collaborator on save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::export::CanvasData;

pub const DEFAULT_TITLE: &str = "Untitled Annotation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    #[default]
    Bug,
    Feature,
    Improvement,
    Question,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Values of the metadata form at save time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct AnnotationFields {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: AnnotationType,
    pub priority: Priority,
    pub description: String,
}

impl AnnotationFields {
    /// The title to store: trimmed, or the default when left blank.
    pub fn resolved_title(&self) -> String {
        let title = self.title.trim();
        if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title.to_string()
        }
    }
}

/// Page identity captured when the session started.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub page_url: String,
    pub page_title: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: AnnotationType,
    pub priority: Priority,
    pub description: String,
    pub screenshot_original: String,
    pub screenshot_annotated: String,
    pub canvas_data: CanvasData,
}

impl AnnotationRecord {
    pub fn assemble(
        page: &PageInfo,
        fields: &AnnotationFields,
        screenshot_original: String,
        screenshot_annotated: String,
        canvas_data: CanvasData,
    ) -> Self {
        Self::assemble_with(
            Uuid::new_v4(),
            Utc::now(),
            page,
            fields,
            screenshot_original,
            screenshot_annotated,
            canvas_data,
        )
    }

    pub fn assemble_with(
        id: Uuid,
        created_at: DateTime<Utc>,
        page: &PageInfo,
        fields: &AnnotationFields,
        screenshot_original: String,
        screenshot_annotated: String,
        canvas_data: CanvasData,
    ) -> Self {
        Self {
            id,
            created_at,
            page_url: page.url.clone(),
            page_title: page.title.clone(),
            title: fields.resolved_title(),
            kind: fields.kind,
            priority: fields.priority,
            description: fields.description.clone(),
            screenshot_original,
            screenshot_annotated,
            canvas_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{Canvas, ImageBounds};
    use chrono::TimeZone;

    fn canvas_data() -> CanvasData {
        CanvasData::capture(
            &Canvas::new(ImageBounds::new(10, 10)),
            ImageBounds::new(10, 10),
            1.0,
        )
    }

    #[test]
    fn blank_title_falls_back_to_default() {
        let mut fields = AnnotationFields::default();
        assert_eq!(fields.resolved_title(), DEFAULT_TITLE);
        fields.title = "   ".to_string();
        assert_eq!(fields.resolved_title(), DEFAULT_TITLE);
        fields.title = "  Broken nav ".to_string();
        assert_eq!(fields.resolved_title(), "Broken nav");
    }

    #[test]
    fn record_serializes_with_outbound_field_names() {
        let page = PageInfo {
            url: "https://example.com/checkout".to_string(),
            title: "Checkout".to_string(),
        };
        let fields = AnnotationFields {
            title: String::new(),
            kind: AnnotationType::Feature,
            priority: Priority::High,
            description: "Button overlaps footer".to_string(),
        };
        let created_at = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
            .single()
            .expect("valid timestamp");
        let record = AnnotationRecord::assemble_with(
            Uuid::nil(),
            created_at,
            &page,
            &fields,
            "data:image/png;base64,AAAA".to_string(),
            "data:image/png;base64,BBBB".to_string(),
            canvas_data(),
        );

        let json = serde_json::to_value(&record).expect("record should serialize");
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["createdAt"], "2024-05-01T12:30:00Z");
        assert_eq!(json["pageUrl"], "https://example.com/checkout");
        assert_eq!(json["title"], DEFAULT_TITLE);
        assert_eq!(json["type"], "feature");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["screenshotAnnotated"], "data:image/png;base64,BBBB");
        assert_eq!(json["canvasData"]["version"], 1);
    }

    #[test]
    fn fresh_records_get_unique_ids() {
        let page = PageInfo::default();
        let fields = AnnotationFields::default();
        let first =
            AnnotationRecord::assemble(&page, &fields, String::new(), String::new(), canvas_data());
        let second =
            AnnotationRecord::assemble(&page, &fields, String::new(), String::new(), canvas_data());
        assert_ne!(first.id, second.id);
    }
}
