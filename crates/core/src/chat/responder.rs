//! Rule-based responder.
//!
//! The responder is an ordered decision table: each [`Rule`] pairs a keyword
//! set with a canned response and a follow-up [`BotAction`]. Input is
//! lower-cased and the first rule with any keyword contained in it wins.
//! Unmatched input falls through to the default reply, so the responder never
//! fails.
//!
//! Lead-generating intents (cost, timeline, permits, contact) sit above the
//! project-category rules so that "what's the cost for a medical building?"
//! is treated as a cost question rather than a medical one.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::lead::{
    ProjectType, REASON_CONSULTATION_REQUEST, REASON_COST_ESTIMATE, REASON_TIMELINE_DISCUSSION,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Follow-up the session performs after appending the bot's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BotAction {
    /// Offer the services quick-reply menu for a category.
    ShowServices { category: ProjectType },
    /// Open the lead capture flow, tagged with why it was triggered.
    CaptureLead { reason: Cow<'static, str> },
    /// Append the list of states we work in.
    ShowServiceAreas,
    /// Append a pointer to the project portfolio.
    ShowProjects,
    /// Offer the default quick-reply menu.
    ShowQuickReplies,
}

/// One response: exactly one message and at most one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotReply {
    pub message: String,
    #[serde(default)]
    pub action: Option<BotAction>,
}

/// A row of the decision table.
#[derive(Debug, Clone)]
pub struct Rule {
    pub keywords: &'static [&'static str],
    pub response: &'static str,
    pub action: BotAction,
}

impl Rule {
    /// Whether any keyword occurs in the (already lower-cased) input.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

// ---------------------------------------------------------------------------
// Canned text
// ---------------------------------------------------------------------------

pub const DEFAULT_RESPONSE: &str = "I'm here to help with your construction project questions! I can provide information about our services, project costs, timelines, and more. What would you like to know about MH Construction?";

pub const PROJECTS_MESSAGE: &str = "You can view our portfolio at mhc-gc.com/projects. Would you like me to connect you with our team to discuss a similar project?";

pub const SERVICE_AREAS_MESSAGE: &str = "We proudly serve:\n• Washington State\n• Oregon\n• Idaho\n\nOur team travels throughout the Pacific Northwest for quality construction projects.";

/// Menu offered by the default branch.
pub const DEFAULT_QUICK_REPLIES: &[&str] = &[
    "What services do you offer?",
    "How much will my project cost?",
    "How long does construction take?",
    "Do you handle permits?",
    "Schedule a consultation",
];

/// Menu offered after a services answer.
pub const SERVICES_QUICK_REPLIES: &[&str] = &[
    "Tell me about commercial projects",
    "Medical facility construction",
    "Religious building experience",
    "Industrial construction",
    "Get a quote",
];

// ---------------------------------------------------------------------------
// Decision table
// ---------------------------------------------------------------------------

const fn capture_lead(reason: &'static str) -> BotAction {
    BotAction::CaptureLead {
        reason: Cow::Borrowed(reason),
    }
}

const fn show_services(category: ProjectType) -> BotAction {
    BotAction::ShowServices { category }
}

/// The rules in priority order. Order is significant.
pub const RULES: &[Rule] = &[
    Rule {
        keywords: &["cost", "price", "budget", "estimate"],
        response: "Construction costs vary significantly based on project type, size, location, and complexity. To provide an accurate estimate, I'd need to know more about your project. Would you like to schedule a consultation for a detailed quote?",
        action: capture_lead(REASON_COST_ESTIMATE),
    },
    Rule {
        keywords: &["timeline", "schedule", "how long"],
        response: "Project timelines depend on scope, permits, and complexity. Commercial projects typically range from 3-18 months. Would you like to discuss your specific timeline requirements?",
        action: capture_lead(REASON_TIMELINE_DISCUSSION),
    },
    Rule {
        keywords: &["permit", "license", "regulation"],
        response: "We handle all permitting and regulatory compliance for Washington, Oregon, and Idaho. Our team ensures your project meets all local building codes and requirements. What location is your project in?",
        action: BotAction::ShowServiceAreas,
    },
    Rule {
        keywords: &["contact", "call", "speak", "consultation"],
        response: "I'd be happy to connect you with our team! We offer free consultations to discuss your project needs. What's the best way to reach you?",
        action: capture_lead(REASON_CONSULTATION_REQUEST),
    },
    Rule {
        keywords: &["commercial", "office"],
        response: "Commercial construction is one of our specialties! We handle office buildings, retail spaces, and mixed-use developments. What type of commercial project are you planning?",
        action: show_services(ProjectType::Commercial),
    },
    Rule {
        keywords: &["medical", "healthcare"],
        response: "We have extensive experience with medical facilities, including clinics, medical offices, and specialized healthcare buildings. These projects require specific compliance with healthcare regulations. What's your project scope?",
        action: show_services(ProjectType::Medical),
    },
    Rule {
        keywords: &["church", "religious"],
        response: "Religious facilities are close to our hearts. We've built churches, community centers, and worship spaces with careful attention to acoustics and spiritual atmosphere. Tell me about your vision.",
        action: show_services(ProjectType::Religious),
    },
    Rule {
        keywords: &["winery", "wine", "vineyard"],
        response: "Winery construction requires specialized knowledge of production workflows and climate control. We're experienced with tasting rooms, production facilities, and barrel storage. What's your winery project?",
        action: show_services(ProjectType::Winery),
    },
    Rule {
        keywords: &["industrial", "warehouse", "manufacturing"],
        response: "Industrial construction demands precision and efficiency. We build warehouses, manufacturing facilities, and distribution centers. What type of industrial facility do you need?",
        action: show_services(ProjectType::Industrial),
    },
    Rule {
        keywords: &["tenant improvement", "renovation", "remodel"],
        response: "Tenant improvements are perfect for updating existing spaces. We can transform offices, retail spaces, and other commercial interiors while minimizing business disruption. What space needs updating?",
        action: show_services(ProjectType::Tenant),
    },
    Rule {
        keywords: &["experience", "credential", "licensed"],
        response: "MH Construction has over 150 years of combined commercial construction experience. We're a veteran-owned company with all necessary licenses and insurance. Would you like to see examples of our recent projects?",
        action: BotAction::ShowProjects,
    },
    Rule {
        keywords: &["washington", "oregon", "idaho", "service area"],
        response: "We serve Washington, Oregon, and Idaho. Our main office is in Pasco, WA, but we travel throughout the Pacific Northwest for projects. Where is your project located?",
        action: BotAction::ShowServiceAreas,
    },
];

// ---------------------------------------------------------------------------
// Responder
// ---------------------------------------------------------------------------

/// Scans a rule table in order. Defaults to [`RULES`].
#[derive(Debug, Clone, Copy)]
pub struct Responder {
    rules: &'static [Rule],
}

impl Responder {
    pub fn new(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    /// Index of the first rule matching `input`, if any.
    pub fn matching_rule(&self, input: &str) -> Option<usize> {
        let lowered = input.to_lowercase();
        self.rules.iter().position(|r| r.matches(&lowered))
    }

    /// Produce exactly one reply for `input`.
    pub fn respond(&self, input: &str) -> BotReply {
        match self.matching_rule(input) {
            Some(idx) => {
                let rule = &self.rules[idx];
                BotReply {
                    message: rule.response.to_string(),
                    action: Some(rule.action.clone()),
                }
            }
            None => BotReply {
                message: DEFAULT_RESPONSE.to_string(),
                action: Some(BotAction::ShowQuickReplies),
            },
        }
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(RULES)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn reason_of(reply: &BotReply) -> Option<&str> {
        match &reply.action {
            Some(BotAction::CaptureLead { reason }) => Some(reason.as_ref()),
            _ => None,
        }
    }

    #[test]
    fn every_input_gets_one_reply() {
        let responder = Responder::default();
        for input in ["", "   ", "hello", "COST?", "🏗️", "what about wine"] {
            let reply = responder.respond(input);
            assert!(!reply.message.is_empty(), "empty reply for {input:?}");
        }
    }

    #[test]
    fn unmatched_input_gets_default_with_quick_replies() {
        let reply = Responder::default().respond("good morning");
        assert_eq!(reply.message, DEFAULT_RESPONSE);
        assert_eq!(reply.action, Some(BotAction::ShowQuickReplies));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let reply = Responder::default().respond("Do you build a WAREHOUSE?");
        assert_eq!(
            reply.action,
            Some(BotAction::ShowServices {
                category: ProjectType::Industrial
            })
        );
    }

    #[test]
    fn cost_question_about_medical_building_is_a_cost_question() {
        let reply = Responder::default().respond("What's the cost for a medical building?");
        assert_eq!(reason_of(&reply), Some(REASON_COST_ESTIMATE));
    }

    #[test]
    fn earlier_rule_wins_regardless_of_later_matches() {
        let responder = Responder::default();
        // "budget" (rule 0) and "schedule" (rule 1) and "commercial" (rule 4).
        let input = "commercial office schedule and budget";
        assert_eq!(responder.matching_rule(input), Some(0));

        // Without the cost keyword the timeline rule wins over commercial.
        assert_eq!(responder.matching_rule("commercial schedule"), Some(1));
    }

    #[test]
    fn priority_follows_table_order_for_all_pairs() {
        let responder = Responder::default();
        for (hi, hi_rule) in RULES.iter().enumerate() {
            for lo_rule in &RULES[hi + 1..] {
                let input = format!("{} {}", lo_rule.keywords[0], hi_rule.keywords[0]);
                let matched = responder.matching_rule(&input).unwrap();
                assert!(
                    matched <= hi,
                    "input {input:?} matched rule {matched}, expected at most {hi}"
                );
            }
        }
    }

    #[test]
    fn multi_word_keywords_match_as_phrases() {
        let responder = Responder::default();
        assert_eq!(
            responder.respond("how long will it take").action,
            Some(capture_lead(REASON_TIMELINE_DISCUSSION))
        );
        assert_eq!(
            responder.respond("a tenant improvement job").action,
            Some(show_services(ProjectType::Tenant))
        );
    }

    #[test]
    fn permits_and_regions_show_service_areas() {
        let responder = Responder::default();
        assert_eq!(
            responder.respond("do you pull permits?").action,
            Some(BotAction::ShowServiceAreas)
        );
        assert_eq!(
            responder.respond("we're in Idaho").action,
            Some(BotAction::ShowServiceAreas)
        );
    }

    #[test]
    fn experience_shows_projects() {
        let reply = Responder::default().respond("how much experience do you have");
        assert_eq!(reply.action, Some(BotAction::ShowProjects));
    }

    #[test]
    fn action_round_trips_through_tagged_json() {
        let action = capture_lead(REASON_CONSULTATION_REQUEST);
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "capture_lead");
        assert_eq!(json["reason"], REASON_CONSULTATION_REQUEST);

        let services: BotAction =
            serde_json::from_value(serde_json::json!({"type": "show_services", "category": "winery"}))
                .unwrap();
        assert_eq!(services, show_services(ProjectType::Winery));
    }
}
