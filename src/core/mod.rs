pub mod auth;
pub mod chat_client;
pub mod directory;
pub mod i18n;
pub mod session;

pub use crate::domain::model::{
    ChatHistoryEntry, ChatQuery, ChatReply, ContactForm, ProfessionalFilter, ProfessionalRecord,
    ServiceIdentifier,
};
pub use crate::domain::ports::{ConfigProvider, ProfessionalDirectory};
pub use crate::utils::error::Result;
