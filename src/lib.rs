pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliArgs, Command};
pub use config::AppConfig;

pub use adapters::registry::RestRegistry;
pub use core::{
    auth::{AuthContext, AuthSubscription},
    chat_client::ChatClient,
    directory::{DirectoryQueryService, DirectoryState, DirectoryView, LoadTicket},
    i18n::Translations,
    session::ChatSession,
};
pub use domain::model::{
    ChatHistory, ChatHistoryEntry, ChatQuery, ChatReply, ChatRole, ContactForm, NavigationParams,
    ProfessionalFilter, ProfessionalId, ProfessionalRecord, ServiceIdentifier, UserSession,
};
pub use utils::error::{ChatError, LawMateError, QueryError, Result, SubmitError};
