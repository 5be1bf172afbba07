//! SendGrid mail delivery
//!
//! Posts fully rendered messages to the SendGrid v3 mail/send API with
//! one-click unsubscribe headers and provider-side open/click tracking
//! enabled. Any non-2xx response or transport failure is a single
//! boolean-style outcome for the dispatch loop; there is no retry here.

use serde_json::json;
use tracing::info;

use crate::error::{DispatcherError, DispatcherResult};
use crate::traits::{Mailer, OutboundEmail};

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
    from_address: String,
    from_name: String,
    base_url: String,
}

impl SendGridMailer {
    pub fn new(api_key: String, from_address: String, from_name: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from_address,
            from_name,
            base_url,
        }
    }

    fn request_body(&self, message: &OutboundEmail) -> serde_json::Value {
        let unsubscribe_url = format!(
            "{}/unsubscribe?email={}&id={}",
            self.base_url, message.to, message.tracking_id
        );

        json!({
            "personalizations": [{
                "to": [{ "email": message.to }]
            }],
            "from": {
                "email": self.from_address,
                "name": self.from_name
            },
            "subject": message.subject,
            "content": [
                { "type": "text/plain", "value": message.text_body },
                { "type": "text/html", "value": message.html_body }
            ],
            "headers": {
                "List-Unsubscribe": format!(
                    "<mailto:unsubscribe@routepricing.com?subject=Unsubscribe>, <{unsubscribe_url}>"
                ),
                "List-Unsubscribe-Post": "List-Unsubscribe=One-Click"
            },
            "tracking_settings": {
                "click_tracking": { "enable": true, "enable_text": true },
                "open_tracking": { "enable": true }
            }
        })
    }
}

#[async_trait::async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, message: &OutboundEmail) -> DispatcherResult<()> {
        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(message))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("✅ Email sent to {} (Status: {})", message.to, status.as_u16());
            Ok(())
        } else {
            Err(DispatcherError::SendRejected {
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_message() -> OutboundEmail {
        OutboundEmail {
            to: "alice@example.com".to_string(),
            subject: "Hello".to_string(),
            html_body: "<p>Hi</p>".to_string(),
            text_body: "Hi".to_string(),
            tracking_id: "abc123".to_string(),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let mailer = SendGridMailer::new(
            "SG.key".to_string(),
            "outreach@example.com".to_string(),
            "Outreach".to_string(),
            "https://outreach.test".to_string(),
        );
        let body = mailer.request_body(&test_message());

        assert_eq!(
            body["personalizations"][0]["to"][0]["email"],
            "alice@example.com"
        );
        assert_eq!(body["from"]["email"], "outreach@example.com");
        assert_eq!(body["content"][0]["type"], "text/plain");
        assert_eq!(body["content"][1]["type"], "text/html");
        assert_eq!(
            body["headers"]["List-Unsubscribe-Post"],
            "List-Unsubscribe=One-Click"
        );
        assert!(body["headers"]["List-Unsubscribe"]
            .as_str()
            .unwrap()
            .contains("/unsubscribe?email=alice@example.com&id=abc123"));
        assert_eq!(body["tracking_settings"]["open_tracking"]["enable"], true);
    }
}
