//! English/Chinese message tables for server-generated text.

use serde::{Deserialize, Serialize};

/// Site language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Zh];

    /// Parse a language tag (`en`, `zh`, `zh-CN`, `zh_Hant`, ...). Unknown tags fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "zh" | "cn" => Language::Zh,
            _ => Language::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }
}

/// Lenient deserializer: any string maps through [`Language::from_tag`].
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Language, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag.as_deref().map(Language::from_tag).unwrap_or_default())
}

/// Localized strings used by the inquiry flow.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub inquiry_received: &'static str,
    pub inquiry_failed: &'static str,
    pub confirmation_subject: &'static str,
    pub confirmation_greeting: &'static str,
    pub confirmation_body: &'static str,
    pub confirmation_summary: &'static str,
    pub confirmation_contact: &'static str,
    pub confirmation_signoff: &'static str,
    pub field_service: &'static str,
    pub field_travel_date: &'static str,
    pub field_preferred_contact: &'static str,
}

const EN: Messages = Messages {
    inquiry_received: "Thank you! Your inquiry has been received. Our team will contact you within 24 hours.",
    inquiry_failed: "Failed to process inquiry",
    confirmation_subject: "We received your inquiry",
    confirmation_greeting: "Dear",
    confirmation_body: "Thank you for reaching out. A dedicated coordinator will review your request and get back to you within 24 hours.",
    confirmation_summary: "Your request",
    confirmation_contact: "If you need to reach us sooner, reply to this email or contact us at",
    confirmation_signoff: "Warm regards, the concierge team",
    field_service: "Service",
    field_travel_date: "Travel date",
    field_preferred_contact: "Preferred contact",
};

const ZH: Messages = Messages {
    inquiry_received: "感谢您的咨询！我们已收到您的信息，团队将在24小时内与您联系。",
    inquiry_failed: "提交失败，请稍后重试",
    confirmation_subject: "我们已收到您的咨询",
    confirmation_greeting: "尊敬的",
    confirmation_body: "感谢您的信任。专属顾问将审阅您的需求，并在24小时内与您联系。",
    confirmation_summary: "您的需求",
    confirmation_contact: "如需尽快联系我们，请直接回复此邮件或发送邮件至",
    confirmation_signoff: "此致敬礼，礼宾服务团队",
    field_service: "服务项目",
    field_travel_date: "出行日期",
    field_preferred_contact: "首选联系方式",
};

/// Message table for `lang`.
pub fn messages(lang: Language) -> &'static Messages {
    match lang {
        Language::En => &EN,
        Language::Zh => &ZH,
    }
}
