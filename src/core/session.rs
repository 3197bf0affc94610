use crate::core::auth::AuthContext;
use crate::core::chat_client::ChatClient;
use crate::domain::model::{ChatHistoryEntry, ChatQuery, ChatReply, ServiceIdentifier};
use crate::utils::error::{ChatError, LawMateError, Result};
use serde_json::Value;

/// 綁定單一 (service, userId) 的聊天 session
#[derive(Debug, Clone)]
pub struct ChatSession {
    client: ChatClient,
    service: ServiceIdentifier,
    user_id: String,
}

impl ChatSession {
    pub fn new(client: ChatClient, service: ServiceIdentifier, user_id: impl Into<String>) -> Self {
        if !service.is_known_chat_service() {
            tracing::warn!(
                "⚠️ '{}' is not a known chat service, the backend may reject it",
                service
            );
        }
        Self {
            client,
            service,
            user_id: user_id.into(),
        }
    }

    /// 身分取自目前登入的使用者；未登入時失敗
    pub fn from_auth(
        client: ChatClient,
        service: ServiceIdentifier,
        auth: &AuthContext,
    ) -> Result<Self> {
        let user = auth.current_user().ok_or_else(|| LawMateError::AuthError {
            message: "sign in before starting a chat".to_string(),
        })?;
        Ok(Self::new(client, service, user.user_id))
    }

    pub fn service(&self) -> &ServiceIdentifier {
        &self.service
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn query(&self, text: impl Into<String>) -> ChatQuery {
        ChatQuery {
            service: self.service.clone(),
            user_id: self.user_id.clone(),
            query: text.into(),
        }
    }

    pub async fn send(&self, query: &ChatQuery) -> std::result::Result<Value, ChatError> {
        self.client
            .send_chat_query(query.service.as_str(), &query.query, &query.user_id)
            .await
    }

    pub async fn ask(&self, text: &str) -> std::result::Result<ChatReply, ChatError> {
        self.client
            .ask(self.service.as_str(), text, &self.user_id)
            .await
    }

    pub async fn history(&self) -> std::result::Result<Vec<ChatHistoryEntry>, ChatError> {
        self.client
            .history(self.service.as_str(), &self.user_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::UserSession;
    use httpmock::prelude::*;

    #[test]
    fn test_from_auth_requires_signed_in_user() {
        let client = ChatClient::new(Some("http://localhost:5000")).unwrap();
        let auth = AuthContext::new();
        let err = ChatSession::from_auth(client.clone(), "consultation".into(), &auth).unwrap_err();
        assert!(matches!(err, LawMateError::AuthError { .. }));

        auth.publish(Some(UserSession::new("user-42")));
        let session = ChatSession::from_auth(client, "consultation".into(), &auth).unwrap();
        assert_eq!(session.user_id(), "user-42");
        assert_eq!(session.query("hello").service.as_str(), "consultation");
    }

    #[test]
    fn test_unknown_service_is_not_enforced() {
        let client = ChatClient::new(Some("http://localhost:5000")).unwrap();
        let service: ServiceIdentifier = "wills".into();
        assert!(!service.is_known_chat_service());

        let session = ChatSession::new(client, service, "user-42");
        assert_eq!(session.service().as_str(), "wills");
    }

    #[tokio::test]
    async fn test_session_scopes_calls() {
        let server = MockServer::start();
        let chat_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/consultation/chat")
                .header("x-user-id", "user-42")
                .json_body(serde_json::json!({"query": "What is a caveat petition?"}));
            then.status(200)
                .json_body(serde_json::json!({"response": "A caveat is filed to be heard first."}));
        });
        let history_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/consultation/history")
                .header("x-user-id", "user-42");
            then.status(200).json_body(serde_json::json!({"history": [
                {"role": "user", "content": "What is a caveat petition?"},
                {"role": "assistant", "content": "A caveat is filed to be heard first."}
            ]}));
        });

        let client = ChatClient::new(Some(&server.base_url())).unwrap();
        let session = ChatSession::new(client, "consultation".into(), "user-42");

        let reply = session.ask("What is a caveat petition?").await.unwrap();
        assert_eq!(reply.response, "A caveat is filed to be heard first.");

        let history = session.history().await.unwrap();
        assert_eq!(history.len(), 2);

        chat_mock.assert();
        history_mock.assert();
    }
}
