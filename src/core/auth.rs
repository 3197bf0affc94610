use crate::domain::model::UserSession;
use crate::utils::error::{LawMateError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// 登入狀態的發布端。外部 auth 服務透過 `publish` 推送變更，
/// 頁面以 `subscribe` 掛上唯一的監聽者，drop 時自動解除。
#[derive(Debug)]
pub struct AuthContext {
    sender: watch::Sender<Option<UserSession>>,
    listener_active: Arc<AtomicBool>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender,
            listener_active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn signed_in(session: UserSession) -> Self {
        let context = Self::new();
        context.publish(Some(session));
        context
    }

    /// 登入（`Some`）或登出（`None`）
    pub fn publish(&self, session: Option<UserSession>) {
        match &session {
            Some(s) => tracing::info!("🔐 Auth state changed: signed in as {}", s.user_id),
            None => tracing::info!("🔐 Auth state changed: signed out"),
        }
        self.sender.send_replace(session);
    }

    pub fn current_user(&self) -> Option<UserSession> {
        self.sender.borrow().clone()
    }

    pub fn has_listener(&self) -> bool {
        self.listener_active.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> Result<AuthSubscription> {
        if self
            .listener_active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(LawMateError::AuthError {
                message: "an auth listener is already subscribed".to_string(),
            });
        }

        tracing::debug!("Auth listener subscribed");
        Ok(AuthSubscription {
            receiver: self.sender.subscribe(),
            listener_active: Arc::clone(&self.listener_active),
        })
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct AuthSubscription {
    receiver: watch::Receiver<Option<UserSession>>,
    listener_active: Arc<AtomicBool>,
}

impl AuthSubscription {
    pub fn user(&self) -> Option<UserSession> {
        self.receiver.borrow().clone()
    }

    /// 等待下一次變更；發布端已釋放時回傳 `None`
    pub async fn changed(&mut self) -> Option<Option<UserSession>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    pub fn unsubscribe(self) {}
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        self.listener_active.store(false, Ordering::SeqCst);
        tracing::debug!("Auth listener unsubscribed");
    }
}
