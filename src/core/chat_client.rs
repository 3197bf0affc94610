use crate::adapters::http::{endpoint, execute_json, USER_ID_HEADER};
use crate::domain::model::{ChatHistory, ChatHistoryEntry, ChatReply, ContactForm};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ChatError, LawMateError, Result, SubmitError};
use crate::utils::validation::{validate_email, validate_non_empty_string, validate_url, Validate};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// 聊天後端的 HTTP client。每個操作都是單次請求，不重試，也不吞掉上游錯誤。
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl ChatClient {
    /// 沒有 backend URL 時直接失敗，不會發出任何請求
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let base_url = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| LawMateError::MissingConfigError {
                field: "backend.base_url".to_string(),
            })?;
        validate_url("backend.base_url", base_url)?;

        tracing::debug!("Chat backend configured at {}", base_url);
        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut client = Self::new(config.backend_url())?;
        client.timeout = config.request_timeout();
        Ok(client)
    }

    /// 回傳套用指定期限的副本；底層連線池共用
    pub fn with_deadline(&self, deadline: Duration) -> Self {
        Self {
            timeout: Some(deadline),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn submit_form<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> std::result::Result<Value, SubmitError> {
        let body = serde_json::to_value(payload)
            .map_err(|e| SubmitError::InvalidForm(e.to_string()))?;
        if !body.is_object() {
            return Err(SubmitError::InvalidForm(
                "form payload must be a JSON object".to_string(),
            ));
        }

        let url = endpoint(&self.base_url, &["submit-form"]);
        tracing::debug!("Submitting form to {}", url);

        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&body);

        let response = execute_json(request, self.timeout).await?;
        tracing::info!("Form submitted");
        Ok(response)
    }

    /// 先在本地檢查必填欄位，再送出聯絡表單
    pub async fn submit_contact_form(
        &self,
        form: &ContactForm,
    ) -> std::result::Result<Value, SubmitError> {
        form.validate()
            .map_err(|e| SubmitError::InvalidForm(e.user_friendly_message()))?;
        self.submit_form(form).await
    }

    pub async fn send_chat_query(
        &self,
        service: &str,
        query: &str,
        user_id: &str,
    ) -> std::result::Result<Value, ChatError> {
        check_service(service)?;
        // 空白的 query 與 user id 交給後端判斷，錯誤訊息原樣回傳
        let user_header = user_header(user_id)?;

        let url = endpoint(&self.base_url, &[service, "chat"]);
        tracing::debug!("Sending chat query to {}", url);

        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_ID_HEADER, user_header)
            .json(&serde_json::json!({ "query": query }));

        let response = execute_json(request, self.timeout).await?;
        tracing::info!("Chat reply received for service '{}'", service);
        Ok(response)
    }

    pub async fn get_chat_history(
        &self,
        service: &str,
        user_id: &str,
    ) -> std::result::Result<Value, ChatError> {
        check_service(service)?;
        let user_header = user_header(user_id)?;

        let url = endpoint(&self.base_url, &[service, "history"]);
        tracing::debug!("Fetching chat history from {}", url);

        let request = self.client.get(&url).header(USER_ID_HEADER, user_header);
        execute_json(request, self.timeout).await.map_err(ChatError::from)
    }

    /// `send_chat_query` 的型別化版本
    pub async fn ask(
        &self,
        service: &str,
        query: &str,
        user_id: &str,
    ) -> std::result::Result<ChatReply, ChatError> {
        let value = self.send_chat_query(service, query, user_id).await?;
        serde_json::from_value(value).map_err(|e| ChatError::InvalidResponse(e.to_string()))
    }

    /// 型別化的歷史紀錄；接受 `{"history": [...]}` 或直接的陣列
    pub async fn history(
        &self,
        service: &str,
        user_id: &str,
    ) -> std::result::Result<Vec<ChatHistoryEntry>, ChatError> {
        let value = self.get_chat_history(service, user_id).await?;
        let entries = if value.is_array() {
            serde_json::from_value(value)
        } else {
            serde_json::from_value::<ChatHistory>(value).map(|h| h.history)
        };
        entries.map_err(|e| ChatError::InvalidResponse(e.to_string()))
    }

    pub async fn health(&self) -> std::result::Result<Value, ChatError> {
        let request = self.client.get(endpoint(&self.base_url, &[]));
        execute_json(request, self.timeout).await.map_err(ChatError::from)
    }
}

fn check_service(service: &str) -> std::result::Result<(), ChatError> {
    if service.trim().is_empty() {
        return Err(ChatError::InvalidInput("service cannot be empty".to_string()));
    }
    Ok(())
}

fn user_header(user_id: &str) -> std::result::Result<HeaderValue, ChatError> {
    HeaderValue::from_str(user_id)
        .map_err(|_| ChatError::InvalidInput(format!("user id '{}' is not a valid header value", user_id)))
}

impl Validate for ContactForm {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("firstName", &self.first_name)?;
        validate_non_empty_string("lastName", &self.last_name)?;
        validate_non_empty_string("email", &self.email)?;
        validate_email("email", &self.email)?;
        validate_non_empty_string("subject", &self.subject)?;
        validate_non_empty_string("message", &self.message)?;
        Ok(())
    }
}
