use crate::domain::model::{ProfessionalFilter, ProfessionalRecord};
use crate::utils::error::QueryError;
use async_trait::async_trait;
use std::time::Duration;

/// 專業人士 registry 的讀取能力，後端可替換（REST、測試用 fake）
#[async_trait]
pub trait ProfessionalDirectory: Send + Sync {
    async fn query(
        &self,
        filter: &ProfessionalFilter,
    ) -> std::result::Result<Vec<ProfessionalRecord>, QueryError>;
}

pub trait ConfigProvider: Send + Sync {
    fn backend_url(&self) -> Option<&str>;
    fn registry_url(&self) -> Option<&str>;
    fn registry_key(&self) -> Option<&str>;
    fn registry_table(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
}
