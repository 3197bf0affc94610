use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 後端接受聊天請求的服務領域
pub const KNOWN_CHAT_SERVICES: [&str; 3] = [
    "personal-and-family-legal-assistance",
    "business-consumer-and-criminal-legal-assistance",
    "consultation",
];

/// 服務識別碼，來自導覽 URL 的 `service` 參數（已解碼）
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceIdentifier(String);

impl ServiceIdentifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 從可能經過 percent-encoding 的原始值建立；無法解碼時保留原值
    pub fn from_encoded(raw: &str) -> Self {
        match urlencoding::decode(raw) {
            Ok(decoded) => Self(decoded.into_owned()),
            Err(_) => Self(raw.to_string()),
        }
    }

    /// 從導覽 query string（`service=...&city=...`，可含前導 `?`）取出服務
    pub fn from_query_string(query: &str) -> Self {
        NavigationParams::parse(query).service
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn is_known_chat_service(&self) -> bool {
        KNOWN_CHAT_SERVICES.contains(&self.0.as_str())
    }

    /// 頁面標題用的顯示名稱，會再解碼一次殘留的 percent-encoding
    pub fn display_label(&self) -> String {
        if self.is_empty() {
            return "Selected Service".to_string();
        }
        urlencoding::decode(&self.0)
            .map(|label| label.into_owned())
            .unwrap_or_else(|_| self.0.clone())
    }
}

impl fmt::Display for ServiceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceIdentifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// 專業人士頁面的導覽參數
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationParams {
    pub service: ServiceIdentifier,
    pub city: Option<String>,
}

impl NavigationParams {
    pub fn parse(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let mut params = Self::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "service" => params.service = ServiceIdentifier::new(value.into_owned()),
                "city" if !value.trim().is_empty() => params.city = Some(value.into_owned()),
                _ => {}
            }
        }

        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfessionalId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProfessionalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfessionalId::Number(n) => write!(f, "{}", n),
            ProfessionalId::Text(s) => f.write_str(s),
        }
    }
}

/// `legal_professionals` 表中的一列；可為 null 的欄位讀成預設值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalRecord {
    pub id: ProfessionalId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specialization: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience_years: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    pub service_slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub verified: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ProfessionalRecord {
    pub fn matches(&self, service: &ServiceIdentifier) -> bool {
        self.verified && self.service_slug == service.as_str()
    }
}

/// 送往 registry 的篩選條件；service 與 verified 永遠同時套用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfessionalFilter {
    pub service: ServiceIdentifier,
    pub city: Option<String>,
}

impl ProfessionalFilter {
    pub fn for_service(service: ServiceIdentifier) -> Self {
        Self {
            service,
            city: None,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn accepts(&self, record: &ProfessionalRecord) -> bool {
        record.matches(&self.service)
            && self.city.as_ref().map_or(true, |city| &record.city == city)
    }
}

impl From<NavigationParams> for ProfessionalFilter {
    fn from(params: NavigationParams) -> Self {
        Self {
            service: params.service,
            city: params.city,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatQuery {
    pub service: ServiceIdentifier,
    pub user_id: String,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryEntry {
    pub role: ChatRole,
    pub content: String,
}

/// `GET /{service}/history` 的回應
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    #[serde(default)]
    pub history: Vec<ChatHistoryEntry>,
}

/// `POST /{service}/chat` 的回應
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// 聯絡表單；後端要求五個欄位皆非空，其餘欄位原樣送出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ContactForm {
    pub const REQUIRED_FIELDS: [&'static str; 5] =
        ["firstName", "lastName", "email", "subject", "message"];
}

/// 外部 auth 服務發布的使用者身分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    pub email: Option<String>,
    pub signed_in_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            signed_in_at: Utc::now(),
        }
    }
}
