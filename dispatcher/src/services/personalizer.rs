//! Outreach content personalization
//!
//! Renders the campaign message for one recipient: a subject chosen at
//! random from a fixed pool (outreach variety, not correctness), an HTML
//! body carrying the tracking pixel, click-tracked call-to-action and
//! unsubscribe link, and a plain-text alternative for deliverability.

use rand::seq::SliceRandom;

use crate::traits::{EmailContent, Personalizer};

/// Destination the call-to-action link redirects to
pub const DEFAULT_DESTINATION_URL: &str =
    "https://wordpress.org/plugins/calculate-prices-based-on-distance-for-woocommerce/";

pub struct OutreachPersonalizer {
    base_url: String,
    destination_url: String,
}

impl OutreachPersonalizer {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            destination_url: DEFAULT_DESTINATION_URL.to_string(),
        }
    }

    pub fn with_destination_url(mut self, destination_url: String) -> Self {
        self.destination_url = destination_url;
        self
    }

    /// Display name derived from the address local part
    ///
    /// "jane.doe@example.com" becomes "Jane Doe".
    fn display_name(recipient: &str) -> String {
        let local_part = recipient.split('@').next().unwrap_or(recipient);
        local_part
            .split('.')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn pick_subject(&self, first_name: &str) -> String {
        let options = [
            "Set delivery cost per km/mile for your store".to_string(),
            format!("Distance-based pricing for your {first_name} business"),
            "WooCommerce delivery pricing by distance".to_string(),
            "Calculate delivery fees automatically by distance".to_string(),
        ];
        options
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| options[0].clone())
    }
}

impl Personalizer for OutreachPersonalizer {
    fn personalize(&self, recipient: &str, tracking_id: &str) -> EmailContent {
        let username = Self::display_name(recipient);
        let first_name = username.split(' ').next().unwrap_or(&username).to_string();

        let subject = self.pick_subject(&first_name);

        let base = &self.base_url;
        let tracking_pixel_url = format!("{base}/track/{tracking_id}");
        let unsubscribe_url = format!("{base}/unsubscribe?email={recipient}&id={tracking_id}");
        let click_tracking_url =
            format!("{base}/click/{tracking_id}?url={}", self.destination_url);

        let html_body = format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
  </head>
  <body style="font-family: Arial, sans-serif; background-color: #f9f9f9; padding: 20px; color: #333; line-height: 1.6;">
    <div style="max-width: 600px; margin: auto; background: #fff; border: 1px solid #ddd; padding: 25px; border-radius: 6px;">
      <p>Hi {username},</p>
      <h2 style="color: #1a73e8; margin-top: 15px;">📍 Add Real-Time Distance-Based Delivery Pricing to Your WooCommerce Store</h2>
      <p>
        Our free plugin for WooCommerce lets you automatically calculate delivery costs per
        <strong>mile or kilometer</strong>, based on the <strong>real-time distance</strong>
        between your store and your customer.
      </p>
      <p>
        It's perfect for restaurants, couriers, service businesses, or anyone who wants to set
        accurate delivery fees that scale with distance.
      </p>
      <p style="text-align: center; margin: 25px 0;">
        <a href="{click_tracking_url}"
           style="background-color: #1a73e8; color: white; padding: 12px 25px; text-decoration: none; border-radius: 4px; font-weight: bold; display: inline-block;">
          Get the plugin now
        </a>
      </p>
      <p>
        Best regards,<br />
        The RoutePricing Team
      </p>
      <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0 20px;" />
      <p style="font-size: 12px; color: #888;">
        You received this email because your business is publicly listed as a WooCommerce user.
        This is a one-time outreach to share a relevant free tool.
      </p>
      <p style="font-size: 12px; color: #888;">
        <a href="{unsubscribe_url}" style="color: #666;">Unsubscribe</a>
      </p>
    </div>
    <img src="{tracking_pixel_url}" width="1" height="1" alt="" style="display:none;">
  </body>
</html>
"#
        );

        let text_body = format!(
            r#"Hi {username},

ADD REAL-TIME DISTANCE-BASED DELIVERY PRICING TO YOUR WOOCOMMERCE STORE

Our free plugin for WooCommerce lets you automatically calculate delivery costs per mile or kilometer, based on the real-time distance between your store and your customer.

It's perfect for restaurants, couriers, service businesses, or anyone who wants to set accurate delivery fees that scale with distance.

Get the plugin now: {click_tracking_url}

Best regards,
The RoutePricing Team

---

You received this email because your business is publicly listed as a WooCommerce user. This is a one-time outreach to share a relevant free tool.

Unsubscribe: {unsubscribe_url}
"#
        );

        EmailContent {
            subject,
            html_body,
            text_body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_title_cases_local_part() {
        assert_eq!(
            OutreachPersonalizer::display_name("jane.doe@example.com"),
            "Jane Doe"
        );
        assert_eq!(OutreachPersonalizer::display_name("bob@example.com"), "Bob");
    }

    #[test]
    fn test_content_embeds_tracking_urls() {
        let personalizer = OutreachPersonalizer::new("https://outreach.test".to_string());
        let content = personalizer.personalize("jane.doe@example.com", "abc123");

        assert!(content.html_body.contains("https://outreach.test/track/abc123"));
        assert!(content
            .html_body
            .contains("https://outreach.test/click/abc123?url="));
        assert!(content
            .html_body
            .contains("/unsubscribe?email=jane.doe@example.com&id=abc123"));
        assert!(content.text_body.contains("Unsubscribe:"));
        assert!(content.html_body.contains("Hi Jane Doe,"));
        assert!(!content.subject.is_empty());
    }
}
