use serde::{Deserialize, Serialize};

/// Language used for the fixed strings this client writes into the transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Locale::En),
            "ar" | "arabic" => Some(Locale::Ar),
            _ => None,
        }
    }

    /// Text of the turn appended when a response stream fails.
    pub fn connection_error_message(self) -> &'static str {
        match self {
            Locale::En => {
                "Error: the connection to the model failed. Check your connection and try again."
            }
            Locale::Ar => "خطأ: فشل الاتصال بالنموذج. يرجى التحقق من الاتصال والمحاولة مرة أخرى.",
        }
    }

    pub fn processing_label(self) -> &'static str {
        match self {
            Locale::En => "processing...",
            Locale::Ar => "جاري المعالجة...",
        }
    }

    pub fn user_label(self) -> &'static str {
        match self {
            Locale::En => "You",
            Locale::Ar => "المستخدم",
        }
    }

    pub fn model_label(self) -> &'static str {
        "ShadowCoder"
    }
}
