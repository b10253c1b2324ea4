//! Lead capture form and the inquiry record it produces.

use serde::de::value::StrDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, FieldErrors};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Reason tags
// ---------------------------------------------------------------------------

/// The visitor asked about cost, pricing, budget or an estimate.
pub const REASON_COST_ESTIMATE: &str = "cost_estimate";
/// The visitor asked about schedules or project duration.
pub const REASON_TIMELINE_DISCUSSION: &str = "timeline_discussion";
/// The visitor asked to talk to someone.
pub const REASON_CONSULTATION_REQUEST: &str = "consultation_request";

/// Lead source recorded for chatbot submissions.
pub const SOURCE_CHATBOT: &str = "chatbot";

/// Notification type attached to chatbot lead emails.
pub const NOTIFICATION_TYPE_CHATBOT_LEAD: &str = "chatbot_lead";

const REQUIRED_MESSAGE: &str = "This field is required";

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Construction category, shared by the lead form and the project catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Commercial,
    Medical,
    Religious,
    Winery,
    Industrial,
    Tenant,
    Other,
}

impl ProjectType {
    pub const ALL: [ProjectType; 7] = [
        ProjectType::Commercial,
        ProjectType::Medical,
        ProjectType::Religious,
        ProjectType::Winery,
        ProjectType::Industrial,
        ProjectType::Tenant,
        ProjectType::Other,
    ];

    /// Stored value, e.g. `"tenant"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::Commercial => "commercial",
            ProjectType::Medical => "medical",
            ProjectType::Religious => "religious",
            ProjectType::Winery => "winery",
            ProjectType::Industrial => "industrial",
            ProjectType::Tenant => "tenant",
            ProjectType::Other => "other",
        }
    }

    /// Option label shown in the lead form.
    pub fn label(self) -> &'static str {
        match self {
            ProjectType::Commercial => "Commercial",
            ProjectType::Medical => "Medical Facility",
            ProjectType::Religious => "Religious Facility",
            ProjectType::Winery => "Winery",
            ProjectType::Industrial => "Industrial",
            ProjectType::Tenant => "Tenant Improvement",
            ProjectType::Other => "Other",
        }
    }
}

/// Preferred start bucket offered by the lead form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "1-3months")]
    OneToThreeMonths,
    #[serde(rename = "3-6months")]
    ThreeToSixMonths,
    #[serde(rename = "6-12months")]
    SixToTwelveMonths,
    #[serde(rename = "planning")]
    Planning,
}

impl Timeline {
    pub const ALL: [Timeline; 5] = [
        Timeline::Immediate,
        Timeline::OneToThreeMonths,
        Timeline::ThreeToSixMonths,
        Timeline::SixToTwelveMonths,
        Timeline::Planning,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Timeline::Immediate => "immediate",
            Timeline::OneToThreeMonths => "1-3months",
            Timeline::ThreeToSixMonths => "3-6months",
            Timeline::SixToTwelveMonths => "6-12months",
            Timeline::Planning => "planning",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Timeline::Immediate => "ASAP",
            Timeline::OneToThreeMonths => "1-3 months",
            Timeline::ThreeToSixMonths => "3-6 months",
            Timeline::SixToTwelveMonths => "6-12 months",
            Timeline::Planning => "Still planning",
        }
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Values submitted through the chatbot lead form.
///
/// An unselected dropdown arrives as `""` and reads as `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "project_type", deserialize_with = "blank_as_none")]
    pub project_type: Option<ProjectType>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub timeline: Option<Timeline>,
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            let value: StrDeserializer<'_, D::Error> = raw.trim().into_deserializer();
            T::deserialize(value).map(Some)
        }
        _ => Ok(None),
    }
}

impl LeadForm {
    /// Presence-only check of the three required fields.
    ///
    /// The chatbot path does not check email or phone format;
    /// optional fields never affect the outcome.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        for (field, value) in [
            ("name", &self.name),
            ("phone", &self.phone),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                errors.insert(field.to_string(), REQUIRED_MESSAGE.to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A lead written to the `project_inquiries` collection. Write-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub project_type: Option<ProjectType>,
    pub timeline: Option<Timeline>,
    pub source: String,
    pub reason: String,
    pub conversation_id: String,
    pub timestamp: Timestamp,
}

impl LeadRecord {
    /// Build a chatbot lead from a validated form.
    pub fn from_form(form: &LeadForm, reason: &str, conversation_id: &str) -> Self {
        Self {
            name: form.name.trim().to_string(),
            phone: form.phone.trim().to_string(),
            email: form.email.trim().to_string(),
            project_type: form.project_type,
            timeline: form.timeline,
            source: SOURCE_CHATBOT.to_string(),
            reason: reason.to_string(),
            conversation_id: conversation_id.to_string(),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Subject line for the notification sent to the sales team.
    pub fn notification_subject(&self) -> String {
        let project = self
            .project_type
            .map(ProjectType::as_str)
            .unwrap_or("unspecified");
        format!("New Chatbot Lead: {} - {}", self.name, project)
    }

    /// Notification payload: the record plus type and subject.
    pub fn notification_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::to_value(self).unwrap_or_default();
        if let Some(map) = payload.as_object_mut() {
            map.insert(
                "type".into(),
                NOTIFICATION_TYPE_CHATBOT_LEAD.into(),
            );
            map.insert("subject".into(), self.notification_subject().into());
        }
        payload
    }

    /// Confirmation shown to the visitor once the lead is stored.
    pub fn confirmation_message(&self) -> String {
        let project = self
            .project_type
            .map(ProjectType::as_str)
            .unwrap_or("construction");
        format!(
            "Thank you, {}! I've saved your information and our team will contact you within 24 hours. Is there anything else I can help you with about your {} project?",
            self.name, project
        )
    }
}

/// Message shown when the lead could not be stored.
pub fn lead_failure_message(phone: &str) -> String {
    format!(
        "I apologize, but there was an issue saving your information. Please call us directly at {phone} and we'll be happy to help!"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
