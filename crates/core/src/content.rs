//! Site content documents: projects, team, blog posts, awards, client logos.
//!
//! These documents are owned by the hosted store and edited through the admin
//! routes; the site only reads published entries. Field names follow the
//! stored camelCase shape. Date fields are kept as the ISO-8601 strings the
//! store returns, which order correctly as text.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, FieldErrors};
use crate::types::DocId;

/// Field every publishable collection is filtered on.
pub const STATUS_FIELD: &str = "status";

/// Number of featured projects shown on the home page.
pub const FEATURED_PROJECT_LIMIT: usize = 6;

/// Default number of blog posts in the home page carousel.
pub const DEFAULT_BLOG_POST_LIMIT: usize = 3;

/// Number of awards shown on the about page.
pub const AWARD_LIMIT: usize = 3;

// ---------------------------------------------------------------------------
// Publication status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Published,
}

impl PublicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PublicationStatus::Draft => "draft",
            PublicationStatus::Published => "published",
        }
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectTestimonial {
    pub quote: String,
    pub author: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: DocId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub value: Option<String>,
    pub year: Option<String>,
    pub square_footage: Option<String>,
    pub specs: Vec<String>,
    pub images: Vec<String>,
    pub full_description: Option<String>,
    pub features: Vec<String>,
    pub challenges: Vec<String>,
    pub testimonial: Option<ProjectTestimonial>,
    pub featured: bool,
    pub status: PublicationStatus,
    pub completed_date: Option<String>,
}

impl Project {
    /// Display name of the project's category.
    pub fn category_label(&self) -> String {
        format_category(&self.category)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMember {
    pub id: DocId,
    pub name: String,
    pub title: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub credentials: Vec<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPost {
    pub id: DocId,
    pub title: String,
    pub excerpt: String,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub slug: Option<String>,
    pub author: Option<String>,
    pub status: PublicationStatus,
    #[serde(alias = "publishDate")]
    pub published_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Award {
    pub id: DocId,
    pub title: String,
    pub organization: Option<String>,
    pub year: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientLogo {
    pub id: DocId,
    pub name: String,
    pub logo_url: String,
    pub website: Option<String>,
}

// ---------------------------------------------------------------------------
// Admin drafts
// ---------------------------------------------------------------------------

/// Input for a new project. Stored with `status = "draft"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default)]
    pub specs: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
}

impl ProjectDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_fields(&[
            ("title", &self.title),
            ("description", &self.description),
            ("category", &self.category),
        ])
    }
}

/// Input for a new blog post. Stored with `status = "draft"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostDraft {
    pub title: String,
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl BlogPostDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_fields(&[("title", &self.title), ("excerpt", &self.excerpt)])
    }
}

fn require_fields(fields: &[(&str, &String)]) -> Result<(), CoreError> {
    let errors: FieldErrors = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| (name.to_string(), "This field is required".to_string()))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::InvalidFields(errors))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Display name for a stored category value. Unknown values pass through.
pub fn format_category(category: &str) -> String {
    match category {
        "commercial" => "Commercial",
        "medical" => "Medical",
        "religious" => "Religious",
        "winery" => "Winery",
        "industrial" => "Industrial",
        "tenant" => "Tenant Improvement",
        other => other,
    }
    .to_string()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Portfolio shown when the store is empty or unreachable.
pub fn sample_projects() -> Vec<Project> {
    vec![
        Project {
            id: "sample-1".into(),
            title: "Downtown Office Complex".into(),
            description: "Modern 4-story office building with retail space and underground parking.".into(),
            category: "commercial".into(),
            location: "Seattle, WA".into(),
            value: Some("$3.2M".into()),
            year: Some("2023".into()),
            square_footage: Some("45,000 sq ft".into()),
            specs: strings(&["45,000 sq ft", "LEED Certified", "Underground Parking"]),
            images: strings(&["images/projects/commercial-office-1.jpg"]),
            full_description: Some("A comprehensive downtown office development featuring modern amenities, sustainable design, and mixed-use functionality.".into()),
            features: strings(&[
                "LEED Gold Certification",
                "Smart Building Technology",
                "Underground Parking for 200 vehicles",
                "Ground floor retail space",
            ]),
            challenges: strings(&[
                "Complex urban site constraints",
                "Coordination with city utilities",
                "Maintaining business operations in surrounding area",
            ]),
            testimonial: Some(ProjectTestimonial {
                quote: "MH Construction delivered exactly what we envisioned. Their attention to detail and professionalism was exceptional.".into(),
                author: "John Smith".into(),
                title: "Property Developer".into(),
            }),
            featured: true,
            status: PublicationStatus::Published,
            completed_date: Some("2023-10-01".into()),
        },
        Project {
            id: "sample-2".into(),
            title: "Regional Medical Center".into(),
            description: "State-of-the-art medical facility with specialized treatment rooms and diagnostic equipment.".into(),
            category: "medical".into(),
            location: "Portland, OR".into(),
            value: Some("$8.5M".into()),
            year: Some("2023".into()),
            square_footage: Some("25,000 sq ft".into()),
            specs: strings(&["25,000 sq ft", "Medical Grade HVAC", "Infection Control"]),
            images: strings(&["images/projects/medical-clinic-1.jpg"]),
            full_description: Some("A cutting-edge medical facility designed to meet the highest healthcare standards while providing a comfortable patient environment.".into()),
            features: strings(&[
                "Medical-grade HVAC systems",
                "Advanced infection control measures",
                "Specialized treatment rooms",
                "State-of-the-art diagnostic equipment",
            ]),
            challenges: strings(&[
                "Complex medical equipment installation",
                "Maintaining sterile construction environment",
                "Coordinating with ongoing hospital operations",
            ]),
            testimonial: Some(ProjectTestimonial {
                quote: "The team understood our unique medical facility requirements and delivered beyond our expectations.".into(),
                author: "Dr. Sarah Johnson".into(),
                title: "Chief Medical Officer".into(),
            }),
            featured: true,
            status: PublicationStatus::Published,
            completed_date: Some("2023-06-01".into()),
        },
        Project {
            id: "sample-3".into(),
            title: "Community Faith Center".into(),
            description: "Beautiful worship center with sanctuary, fellowship hall, and educational wings.".into(),
            category: "religious".into(),
            location: "Boise, ID".into(),
            value: Some("$2.8M".into()),
            year: Some("2022".into()),
            square_footage: Some("18,000 sq ft".into()),
            specs: strings(&["18,000 sq ft", "Acoustic Design", "Seating for 400"]),
            images: strings(&["images/projects/church-1.jpg"]),
            full_description: Some("A spiritual sanctuary designed to inspire worship while serving the community with versatile spaces for education and fellowship.".into()),
            features: strings(&[
                "Custom acoustic design",
                "Flexible seating arrangements",
                "Multi-purpose fellowship hall",
                "Educational classroom wings",
            ]),
            challenges: strings(&[
                "Achieving optimal acoustics for worship",
                "Balancing traditional and modern design elements",
                "Budget-conscious material selection",
            ]),
            testimonial: Some(ProjectTestimonial {
                quote: "MH Construction helped us create a space that truly serves our congregation and community.".into(),
                author: "Rev. James Mitchell".into(),
                title: "Pastor".into(),
            }),
            featured: true,
            status: PublicationStatus::Published,
            completed_date: Some("2022-09-01".into()),
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn tenant_category_has_long_label() {
        assert_eq!(format_category("tenant"), "Tenant Improvement");
        assert_eq!(format_category("medical"), "Medical");
        assert_eq!(format_category("bridges"), "bridges");
    }

    #[test]
    fn project_deserializes_from_sparse_document() {
        let project: Project = serde_json::from_value(json!({
            "id": "p1",
            "title": "Warehouse",
            "category": "industrial",
            "status": "published",
            "completedDate": "2024-01-15",
        }))
        .unwrap();
        assert_eq!(project.status, PublicationStatus::Published);
        assert_eq!(project.completed_date.as_deref(), Some("2024-01-15"));
        assert!(project.specs.is_empty());
        assert!(!project.featured);
    }

    #[test]
    fn missing_status_means_draft() {
        let post: BlogPost = serde_json::from_value(json!({"title": "Hello"})).unwrap();
        assert_eq!(post.status, PublicationStatus::Draft);
    }

    #[test]
    fn blog_post_accepts_legacy_publish_date() {
        let post: BlogPost =
            serde_json::from_value(json!({"title": "Hi", "publishDate": "2024-02-01"})).unwrap();
        assert_eq!(post.published_date.as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn draft_requires_title_description_category() {
        let err = ProjectDraft::default().validate().unwrap_err();
        assert_matches!(err, CoreError::InvalidFields(ref fields) if fields.len() == 3);

        let draft = ProjectDraft {
            title: "New".into(),
            description: "Desc".into(),
            category: "winery".into(),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn samples_are_published_and_featured() {
        let samples = sample_projects();
        assert_eq!(samples.len(), 3);
        assert!(samples
            .iter()
            .all(|p| p.status == PublicationStatus::Published && p.featured));
    }
}
