use crate::domain::model::{
    NavigationParams, ProfessionalFilter, ProfessionalRecord, ServiceIdentifier,
};
use crate::domain::ports::ProfessionalDirectory;
use crate::utils::error::QueryError;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// 依服務查詢已驗證的專業人士。沒有快取，每次呼叫都重新查詢 registry。
pub struct DirectoryQueryService<D: ProfessionalDirectory> {
    directory: D,
    deadline: Option<Duration>,
}

impl<D: ProfessionalDirectory> DirectoryQueryService<D> {
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub async fn query_professionals(
        &self,
        service: &ServiceIdentifier,
    ) -> Result<Vec<ProfessionalRecord>, QueryError> {
        self.query_filtered(&ProfessionalFilter::for_service(service.clone()))
            .await
    }

    pub async fn query_filtered(
        &self,
        filter: &ProfessionalFilter,
    ) -> Result<Vec<ProfessionalRecord>, QueryError> {
        if filter.service.is_empty() {
            tracing::debug!("No service selected, skipping registry query");
            return Ok(Vec::new());
        }

        let records = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.directory.query(filter))
                .await
                .map_err(|_| QueryError::TimedOut)??,
            None => self.directory.query(filter).await?,
        };

        let fetched = records.len();
        let records: Vec<ProfessionalRecord> =
            records.into_iter().filter(|r| filter.accepts(r)).collect();
        if records.len() != fetched {
            tracing::warn!(
                "⚠️ Registry returned {} record(s) outside filter for '{}', dropped",
                fetched - records.len(),
                filter.service
            );
        }

        tracing::info!(
            "Found {} verified professional(s) for '{}'",
            records.len(),
            filter.service
        );
        Ok(records)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryState {
    Idle,
    Loading {
        service: ServiceIdentifier,
    },
    Loaded {
        service: ServiceIdentifier,
        professionals: Vec<ProfessionalRecord>,
    },
    Empty {
        service: ServiceIdentifier,
    },
    Failed {
        service: ServiceIdentifier,
        message: String,
    },
}

impl DirectoryState {
    pub fn service(&self) -> Option<&ServiceIdentifier> {
        match self {
            DirectoryState::Idle => None,
            DirectoryState::Loading { service }
            | DirectoryState::Loaded { service, .. }
            | DirectoryState::Empty { service }
            | DirectoryState::Failed { service, .. } => Some(service),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DirectoryState::Loading { .. })
    }
}

/// `navigate` 發出的查詢憑證，`load` 只在 generation 仍是最新時才套用結果
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    filter: ProfessionalFilter,
}

impl LoadTicket {
    pub fn service(&self) -> &ServiceIdentifier {
        &self.filter.service
    }
}

/// 專業人士頁面的狀態
pub struct DirectoryView<D: ProfessionalDirectory> {
    service: DirectoryQueryService<D>,
    generation: AtomicU64,
    current: Mutex<Option<ProfessionalFilter>>,
    state: Mutex<DirectoryState>,
}

impl<D: ProfessionalDirectory> DirectoryView<D> {
    pub fn new(service: DirectoryQueryService<D>) -> Self {
        Self {
            service,
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
            state: Mutex::new(DirectoryState::Idle),
        }
    }

    /// 切換到新的導覽參數；之前尚未完成的查詢結果將被丟棄
    pub fn navigate(&self, params: impl Into<ProfessionalFilter>) -> LoadTicket {
        let filter = params.into();

        // generation 遞增與寫入 Loading 需在同一把鎖內，避免舊的導覽蓋掉新的標題
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut current) = self.current.lock() {
            *current = Some(filter.clone());
        }
        *state = DirectoryState::Loading {
            service: filter.service.clone(),
        };

        LoadTicket { generation, filter }
    }

    /// 以目前的導覽參數重新查詢
    pub fn reload(&self) -> Option<LoadTicket> {
        let filter = self.current.lock().ok()?.clone()?;
        Some(self.navigate(filter))
    }

    /// 執行查詢；回傳結果是否被套用到畫面狀態
    pub async fn load(&self, ticket: LoadTicket) -> bool {
        let outcome = self.service.query_filtered(&ticket.filter).await;
        let service = ticket.filter.service.clone();

        let next = match outcome {
            Ok(professionals) if professionals.is_empty() => DirectoryState::Empty { service },
            Ok(professionals) => DirectoryState::Loaded {
                service,
                professionals,
            },
            Err(e) => {
                tracing::error!("❌ Failed to fetch professionals for '{}': {}", service, e);
                DirectoryState::Failed {
                    service,
                    message: e.to_string(),
                }
            }
        };

        // generation 檢查與寫入需在同一把鎖內
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        if self.generation.load(Ordering::SeqCst) != ticket.generation {
            tracing::warn!(
                "Discarding stale professionals response for '{}'",
                ticket.filter.service
            );
            return false;
        }
        *state = next;
        true
    }

    /// `navigate` 加上 `load`
    pub async fn open(&self, params: impl Into<ProfessionalFilter>) -> bool {
        let ticket = self.navigate(params);
        self.load(ticket).await
    }

    pub async fn open_from_query(&self, query: &str) -> bool {
        self.open(NavigationParams::parse(query)).await
    }

    pub fn state(&self) -> DirectoryState {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or(DirectoryState::Idle)
    }

    /// 頁面顯示的文字；查詢失敗與查無結果使用不同訊息
    pub fn render(&self) -> String {
        let state = self.state();
        let title = state
            .service()
            .map(ServiceIdentifier::display_label)
            .unwrap_or_else(|| "Selected Service".to_string());

        let mut out = format!("Legal Professionals for {}\n\n", title);
        match &state {
            DirectoryState::Idle => {
                out.push_str("Choose a service to see verified professionals.\n");
            }
            DirectoryState::Loading { .. } => out.push_str("Loading professionals...\n"),
            DirectoryState::Empty { .. } => {
                out.push_str("No verified professionals found for this service.\n");
            }
            DirectoryState::Failed { message, .. } => {
                let _ = writeln!(out, "Could not load professionals: {}", message);
            }
            DirectoryState::Loaded { professionals, .. } => {
                for pro in professionals {
                    let _ = writeln!(out, "{}", pro.name);
                    let _ = writeln!(out, "  Specialization: {}", pro.specialization);
                    let _ = writeln!(out, "  Experience: {} years", pro.experience_years);
                    let _ = writeln!(out, "  City: {}", pro.city);
                    out.push('\n');
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ProfessionalId;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn pro(id: i64, service: &str, verified: bool, city: &str) -> ProfessionalRecord {
        ProfessionalRecord {
            id: ProfessionalId::Number(id),
            name: format!("Adv. Professional {}", id),
            specialization: "General practice".to_string(),
            experience_years: 5,
            city: city.to_string(),
            service_slug: service.to_string(),
            verified,
        }
    }

    /// registry 的假實作：原樣回傳整張表，不做任何篩選
    #[derive(Default)]
    struct FakeDirectory {
        rows: Vec<ProfessionalRecord>,
        calls: AtomicUsize,
        gates: HashMap<String, Arc<Notify>>,
        failure: Option<String>,
    }

    impl FakeDirectory {
        fn with_rows(rows: Vec<ProfessionalRecord>) -> Self {
            Self {
                rows,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ProfessionalDirectory for FakeDirectory {
        async fn query(
            &self,
            filter: &ProfessionalFilter,
        ) -> Result<Vec<ProfessionalRecord>, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = self.gates.get(filter.service.as_str()) {
                gate.notified().await;
            }
            if let Some(message) = &self.failure {
                return Err(QueryError::Upstream(message.clone()));
            }
            Ok(self.rows.clone())
        }
    }

    #[tokio::test]
    async fn test_empty_service_skips_registry() {
        let service = DirectoryQueryService::new(FakeDirectory::with_rows(vec![pro(
            1, "wills", true, "Pune",
        )]));

        for raw in ["", "   "] {
            let result = service
                .query_professionals(&ServiceIdentifier::from_encoded(raw))
                .await
                .unwrap();
            assert!(result.is_empty());
        }
        assert_eq!(service.directory.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_only_verified_matching_records_returned() {
        let rows = vec![
            pro(1, "wills", true, "Pune"),
            pro(2, "wills", false, "Pune"),
            pro(3, "divorce", true, "Delhi"),
            pro(4, "wills", true, "Chennai"),
        ];
        let service = DirectoryQueryService::new(FakeDirectory::with_rows(rows));

        let result = service.query_professionals(&"wills".into()).await.unwrap();
        let ids: Vec<String> = result.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert!(result.iter().all(|r| r.verified && r.service_slug == "wills"));
    }

    #[tokio::test]
    async fn test_city_narrows_result() {
        let rows = vec![pro(1, "wills", true, "Pune"), pro(4, "wills", true, "Chennai")];
        let service = DirectoryQueryService::new(FakeDirectory::with_rows(rows));

        let filter = ProfessionalFilter::for_service("wills".into()).with_city("Chennai");
        let result = service.query_filtered(&filter).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].city, "Chennai");
    }

    #[tokio::test]
    async fn test_every_call_requeries() {
        let service = DirectoryQueryService::new(FakeDirectory::default());
        service.query_professionals(&"wills".into()).await.unwrap();
        service.query_professionals(&"wills".into()).await.unwrap();
        assert_eq!(service.directory.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_deadline_elapses() {
        let mut fake = FakeDirectory::default();
        fake.gates.insert("wills".to_string(), Arc::new(Notify::new()));
        let service =
            DirectoryQueryService::new(fake).with_deadline(Duration::from_millis(20));

        let err = service.query_professionals(&"wills".into()).await.unwrap_err();
        assert_eq!(err, QueryError::TimedOut);
    }

    #[tokio::test]
    async fn test_failed_and_empty_render_differently() {
        let view = DirectoryView::new(DirectoryQueryService::new(FakeDirectory::default()));
        assert!(view.open(ProfessionalFilter::for_service("wills".into())).await);
        assert_eq!(view.state(), DirectoryState::Empty { service: "wills".into() });
        assert!(view
            .render()
            .contains("No verified professionals found for this service."));

        let failing = FakeDirectory {
            failure: Some("connection reset".to_string()),
            ..Default::default()
        };
        let view = DirectoryView::new(DirectoryQueryService::new(failing));
        view.open(ProfessionalFilter::for_service("wills".into())).await;
        let rendered = view.render();
        assert!(rendered.contains("Could not load professionals: connection reset"));
        assert!(!rendered.contains("No verified professionals"));
    }

    #[tokio::test]
    async fn test_render_loaded_cards() {
        let view = DirectoryView::new(DirectoryQueryService::new(FakeDirectory::with_rows(
            vec![pro(9, "divorce%20law", true, "Jaipur")],
        )));
        view.open_from_query("?service=divorce%2520law").await;

        let rendered = view.render();
        assert!(rendered.starts_with("Legal Professionals for divorce law"));
        assert!(rendered.contains("Adv. Professional 9"));
        assert!(rendered.contains("  Experience: 5 years"));
        assert!(rendered.contains("  City: Jaipur"));
    }

    #[tokio::test]
    async fn test_idle_and_loading_render() {
        let view = DirectoryView::new(DirectoryQueryService::new(FakeDirectory::default()));
        assert!(view.render().starts_with("Legal Professionals for Selected Service"));

        let _ticket = view.navigate(ProfessionalFilter::for_service("wills".into()));
        assert!(view.state().is_loading());
        assert!(view.render().contains("Loading professionals..."));
    }

    #[tokio::test]
    async fn test_stale_response_does_not_overwrite_current_service() {
        let wills_gate = Arc::new(Notify::new());
        let mut fake = FakeDirectory::with_rows(vec![
            pro(1, "wills", true, "Pune"),
            pro(2, "divorce", true, "Delhi"),
        ]);
        fake.gates.insert("wills".to_string(), wills_gate.clone());
        let view = Arc::new(DirectoryView::new(DirectoryQueryService::new(fake)));

        let wills_ticket = view.navigate(ProfessionalFilter::for_service("wills".into()));
        let pending = {
            let view = view.clone();
            tokio::spawn(async move { view.load(wills_ticket).await })
        };

        let divorce_ticket = view.navigate(ProfessionalFilter::for_service("divorce".into()));
        assert!(view.load(divorce_ticket).await);

        wills_gate.notify_one();
        let applied = pending.await.unwrap();
        assert!(!applied);

        match view.state() {
            DirectoryState::Loaded {
                service,
                professionals,
            } => {
                assert_eq!(service.as_str(), "divorce");
                assert_eq!(professionals.len(), 1);
                assert_eq!(professionals[0].service_slug, "divorce");
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_concurrent_navigation_shows_latest_service() {
        let view = DirectoryView::new(DirectoryQueryService::new(FakeDirectory::default()));

        for _ in 0..20 {
            let tickets: Vec<LoadTicket> = std::thread::scope(|scope| {
                let handles: Vec<_> = (0..8)
                    .map(|i| {
                        let view = &view;
                        scope.spawn(move || {
                            view.navigate(ProfessionalFilter::for_service(
                                format!("service-{}", i).as_str().into(),
                            ))
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let latest = tickets.iter().max_by_key(|t| t.generation).unwrap();
            assert_eq!(
                view.state(),
                DirectoryState::Loading {
                    service: latest.service().clone()
                }
            );
        }
    }

    #[tokio::test]
    async fn test_reload_uses_current_params() {
        let view = DirectoryView::new(DirectoryQueryService::new(FakeDirectory::with_rows(
            vec![pro(1, "wills", true, "Pune")],
        )));
        assert!(view.reload().is_none());

        view.open(ProfessionalFilter::for_service("wills".into())).await;
        let ticket = view.reload().unwrap();
        assert_eq!(ticket.service().as_str(), "wills");
        assert!(view.load(ticket).await);
        assert_eq!(view.service.directory.calls.load(Ordering::SeqCst), 2);
    }
}
