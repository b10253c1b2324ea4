//! Names of the analytics events emitted by the API and stored in
//! `analytics_events`.

pub const CHATBOT_OPENED: &str = "chatbot_opened";
pub const CHATBOT_MESSAGE_SENT: &str = "chatbot_message_sent";
pub const CHATBOT_LEAD_CAPTURED: &str = "chatbot_lead_captured";
pub const CONTACT_FORM_SUBMITTED: &str = "contact_form_submitted";
pub const CONTACT_FORM_ERROR: &str = "contact_form_error";
pub const PROJECT_FILTER_USED: &str = "project_filter_used";
pub const PROJECT_SEARCH: &str = "project_search";
pub const PROJECT_MODAL_OPENED: &str = "project_modal_opened";
pub const DOCUMENT_CREATED: &str = "document_created";
pub const FILE_UPLOADED: &str = "file_uploaded";
