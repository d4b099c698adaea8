//! Client for the feedback relay function.
//!
//! The relay accepts a JSON report and forwards it as an email; only
//! success/failure comes back. Field validation happens here, before the
//! network, so the UI can surface problems inline.

use crate::error::LibraryError;
use crate::store::{Book, Hadith};
use regex_lite::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Feedback {
    pub name: String,
    pub email: String,
    pub comments: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackReport {
    pub feedback: Feedback,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hadith: Option<Hadith>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
    #[serde(rename = "pageUrl")]
    pub page_url: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

pub struct FeedbackClient {
    endpoint: String,
    http: reqwest::Client,
    email_pattern: Regex,
}

impl FeedbackClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
            email_pattern: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
                .expect("email pattern is valid"),
        }
    }

    /// Comments are required; an email, when given, must look like one.
    pub fn validate(&self, feedback: &Feedback) -> Result<(), LibraryError> {
        if feedback.comments.trim().is_empty() {
            return Err(LibraryError::Validation("comments are required".into()));
        }
        let email = feedback.email.trim();
        if !email.is_empty() && !self.email_pattern.is_match(email) {
            return Err(LibraryError::Validation("invalid email address".into()));
        }
        Ok(())
    }

    pub async fn send(&self, report: &FeedbackReport) -> Result<(), LibraryError> {
        self.validate(&report.feedback)?;
        let response = self
            .http
            .post(&self.endpoint)
            .json(report)
            .send()
            .await
            .map_err(|err| LibraryError::Network(err.to_string()))?;
        if !response.status().is_success() {
            return Err(LibraryError::Network(format!(
                "feedback relay returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> FeedbackClient {
        FeedbackClient::new("http://127.0.0.1:9/send-feedback")
    }

    fn feedback(comments: &str, email: &str) -> Feedback {
        Feedback {
            name: "Reader".into(),
            email: email.into(),
            comments: comments.into(),
        }
    }

    #[test]
    fn empty_comments_are_rejected() {
        let result = client().validate(&feedback("   ", "reader@example.com"));
        assert!(matches!(result, Err(LibraryError::Validation(_))));
    }

    #[test]
    fn malformed_emails_are_rejected() {
        let client = client();
        for bad in ["not-an-email", "a@b", "a b@c.com", "@c.com"] {
            let result = client.validate(&feedback("Typo in hadith 12", bad));
            assert!(matches!(result, Err(LibraryError::Validation(_))), "{bad}");
        }
    }

    #[test]
    fn valid_reports_pass_and_email_is_optional() {
        let client = client();
        client
            .validate(&feedback("Typo in hadith 12", "reader@example.com"))
            .unwrap();
        client.validate(&feedback("Typo in hadith 12", "")).unwrap();
    }

    #[test]
    fn report_payload_uses_the_relay_field_names() {
        let report = FeedbackReport {
            feedback: feedback("Broken reference", "reader@example.com"),
            hadith: None,
            book: None,
            page_url: "https://example.com/book/1".into(),
            kind: Some("about".into()),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["pageUrl"], "https://example.com/book/1");
        assert_eq!(value["type"], "about");
        assert_eq!(value["feedback"]["comments"], "Broken reference");
        assert!(value.get("hadith").is_none());
    }
}
