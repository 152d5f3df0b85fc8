// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::application::errors::ServiceError;
use crate::application::lifecycle::ApplicationLifecycle;
use crate::application::storage::StorageService;
use crate::domain::agent::AgentId;
use crate::domain::application::{
    Application, ApplicationId, ApplicationInfo, ApplicationStatus, InitializedApplication,
    LifecycleError,
};
use crate::domain::context::RequestContext;
use crate::domain::transaction::TransactionInfo;

/// Application lifecycle backed by a concurrent map. Transactions reported by
/// an enabled application are forwarded to the storage backend.
///
/// Saves hold `transitions` shared for the whole status check and insert;
/// status changes hold it exclusively, so an archive never interleaves with
/// a save that already passed its check.
pub struct InMemoryApplicationLifecycle {
    applications: DashMap<ApplicationId, Application>,
    transitions: RwLock<()>,
    storage: Arc<dyn StorageService>,
}

impl InMemoryApplicationLifecycle {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self {
            applications: DashMap::new(),
            transitions: RwLock::new(()),
            storage,
        }
    }

    async fn update(
        &self,
        id: &ApplicationId,
        transition: impl FnOnce(&mut Application) -> Result<(), LifecycleError> + Send,
    ) -> Result<(), ServiceError> {
        let _exclusive = self.transitions.write().await;
        let mut application = self
            .applications
            .get_mut(id)
            .ok_or_else(|| ServiceError::internal(format!("application {} not found", id)))?;
        transition(&mut application).map_err(ServiceError::internal)?;
        info!(application_id = %id, status = ?application.status, "application status changed");
        Ok(())
    }

    fn sorted(mut applications: Vec<Application>) -> Vec<Application> {
        applications.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        applications
    }
}

#[async_trait]
impl ApplicationLifecycle for InMemoryApplicationLifecycle {
    async fn initialize_application(
        &self,
        _ctx: &RequestContext,
        info: ApplicationInfo,
    ) -> Result<InitializedApplication, ServiceError> {
        if info.name.trim().is_empty() {
            return Err(ServiceError::Validation("application name must not be empty".to_string()));
        }
        let application = Application::initialize(info);
        let application_id = application.id.clone();
        info!(application_id = %application_id, name = %application.name, "application registered");
        self.applications.insert(application_id.clone(), application);
        Ok(InitializedApplication { application_id })
    }

    async fn save_transaction(&self, ctx: &RequestContext, info: TransactionInfo) -> Result<(), ServiceError> {
        let _shared = self.transitions.read().await;
        let status = self
            .applications
            .get(&info.application_id)
            .map(|app| app.status)
            .ok_or_else(|| ServiceError::internal(format!("application {} not found", info.application_id)))?;
        if status != ApplicationStatus::Enabled {
            warn!(application_id = %info.application_id, ?status, "transaction from inactive application");
            return Err(ServiceError::internal(format!(
                "application {} is not enabled",
                info.application_id
            )));
        }
        self.storage.save_transaction(ctx, info).await
    }

    async fn get_application_by_id(
        &self,
        _ctx: &RequestContext,
        id: &ApplicationId,
    ) -> Result<Application, ServiceError> {
        self.applications
            .get(id)
            .map(|app| app.value().clone())
            .ok_or_else(|| ServiceError::internal(format!("application {} not found", id)))
    }

    async fn get_application_list(&self, _ctx: &RequestContext) -> Result<Vec<Application>, ServiceError> {
        Ok(Self::sorted(self.applications.iter().map(|app| app.value().clone()).collect()))
    }

    async fn get_application_list_by_agent_id(
        &self,
        _ctx: &RequestContext,
        agent_id: &AgentId,
    ) -> Result<Vec<Application>, ServiceError> {
        Ok(Self::sorted(
            self.applications
                .iter()
                .filter(|app| app.agent_id.as_ref() == Some(agent_id))
                .map(|app| app.value().clone())
                .collect(),
        ))
    }

    async fn archive_application_by_id(&self, _ctx: &RequestContext, id: &ApplicationId) -> Result<(), ServiceError> {
        self.update(id, Application::archive).await
    }

    async fn enable_application_by_id(&self, _ctx: &RequestContext, id: &ApplicationId) -> Result<(), ServiceError> {
        self.update(id, Application::enable).await
    }

    async fn disable_application_by_id(&self, _ctx: &RequestContext, id: &ApplicationId) -> Result<(), ServiceError> {
        self.update(id, Application::disable).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::storage::StandardStorageService;
    use crate::domain::snapshot::{
        SchedulerInformation, SchedulerInformationQuery, SchedulerUptime, SchedulerUptimeQuery, Snapshot,
    };
    use crate::domain::stat::{AgentInformation, AgentStatQuery, StatMetric};
    use crate::domain::transaction::{
        TransactionFilter, TransactionGroupFilter, TransactionGroups, TransactionId, TransactionPage,
        TransactionStatus, TransactionTree, TransactionType,
    };
    use crate::infrastructure::repositories::InMemoryTelemetryRepository;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use tokio::sync::Notify;

    /// Storage whose transaction inserts park until released.
    struct GatedStorage {
        inner: StandardStorageService,
        entered: Notify,
        release: Notify,
    }

    impl GatedStorage {
        fn new() -> Self {
            Self {
                inner: StandardStorageService::new(Arc::new(InMemoryTelemetryRepository::new())),
                entered: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl StorageService for GatedStorage {
        async fn save_snapshot(&self, ctx: &RequestContext, snapshot: Snapshot) -> Result<(), ServiceError> {
            self.inner.save_snapshot(ctx, snapshot).await
        }

        async fn save_stat_metric(&self, ctx: &RequestContext, metric: StatMetric) -> Result<(), ServiceError> {
            self.inner.save_stat_metric(ctx, metric).await
        }

        async fn save_transaction(&self, ctx: &RequestContext, info: TransactionInfo) -> Result<(), ServiceError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.save_transaction(ctx, info).await
        }

        async fn get_scheduler_information(
            &self,
            ctx: &RequestContext,
            query: &SchedulerInformationQuery,
        ) -> Result<SchedulerInformation, ServiceError> {
            self.inner.get_scheduler_information(ctx, query).await
        }

        async fn get_scheduler_uptime(
            &self,
            ctx: &RequestContext,
            query: &SchedulerUptimeQuery,
        ) -> Result<SchedulerUptime, ServiceError> {
            self.inner.get_scheduler_uptime(ctx, query).await
        }

        async fn get_agent_information(
            &self,
            ctx: &RequestContext,
            query: &AgentStatQuery,
        ) -> Result<AgentInformation, ServiceError> {
            self.inner.get_agent_information(ctx, query).await
        }

        async fn get_transactions(
            &self,
            ctx: &RequestContext,
            filter: &TransactionFilter,
        ) -> Result<TransactionPage, ServiceError> {
            self.inner.get_transactions(ctx, filter).await
        }

        async fn get_transaction_by_id(
            &self,
            ctx: &RequestContext,
            id: &TransactionId,
        ) -> Result<TransactionTree, ServiceError> {
            self.inner.get_transaction_by_id(ctx, id).await
        }

        async fn get_transactions_group(
            &self,
            ctx: &RequestContext,
            filter: &TransactionGroupFilter,
        ) -> Result<TransactionGroups, ServiceError> {
            self.inner.get_transactions_group(ctx, filter).await
        }
    }

    fn lifecycle() -> InMemoryApplicationLifecycle {
        let storage = Arc::new(StandardStorageService::new(Arc::new(InMemoryTelemetryRepository::new())));
        InMemoryApplicationLifecycle::new(storage)
    }

    fn info(name: &str, agent: Option<&str>) -> ApplicationInfo {
        ApplicationInfo {
            name: name.to_string(),
            host_name: None,
            port: None,
            agent_id: agent.map(AgentId::from),
            agent_name: None,
        }
    }

    fn tx(application_id: &ApplicationId) -> TransactionInfo {
        let now = Utc::now();
        TransactionInfo {
            id: TransactionId::new(),
            parent_id: None,
            application_id: application_id.clone(),
            name: "login".to_string(),
            host: String::new(),
            path: "/login".to_string(),
            method: "POST".to_string(),
            transaction_type: TransactionType::Http,
            status: TransactionStatus::Success,
            error: None,
            started_at: now,
            ended_at: now,
            meta: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_disabled_application_cannot_report_transactions() {
        let apps = lifecycle();
        let ctx = RequestContext::new();
        let id = apps.initialize_application(&ctx, info("auth", None)).await.unwrap().application_id;

        apps.save_transaction(&ctx, tx(&id)).await.unwrap();
        apps.disable_application_by_id(&ctx, &id).await.unwrap();
        assert!(apps.save_transaction(&ctx, tx(&id)).await.unwrap_err().is_internal());

        apps.enable_application_by_id(&ctx, &id).await.unwrap();
        apps.save_transaction(&ctx, tx(&id)).await.unwrap();

        let page = apps
            .storage
            .get_transactions(&ctx, &TransactionFilter::for_application(id.clone()))
            .await
            .unwrap();
        assert_eq!(page.count, 2);
    }

    #[tokio::test]
    async fn test_archive_is_terminal() {
        let apps = lifecycle();
        let ctx = RequestContext::new();
        let id = apps.initialize_application(&ctx, info("auth", None)).await.unwrap().application_id;

        apps.archive_application_by_id(&ctx, &id).await.unwrap();
        let err = apps.enable_application_by_id(&ctx, &id).await.unwrap_err();
        assert!(err.to_string().contains("archived"));
        assert_eq!(
            apps.get_application_by_id(&ctx, &id).await.unwrap().status,
            ApplicationStatus::Archived
        );
    }

    #[tokio::test]
    async fn test_list_by_agent() {
        let apps = lifecycle();
        let ctx = RequestContext::new();
        apps.initialize_application(&ctx, info("billing", Some("a1"))).await.unwrap();
        apps.initialize_application(&ctx, info("auth", Some("a1"))).await.unwrap();
        apps.initialize_application(&ctx, info("search", Some("a2"))).await.unwrap();

        let names: Vec<String> = apps
            .get_application_list_by_agent_id(&ctx, &AgentId::from("a1"))
            .await
            .unwrap()
            .into_iter()
            .map(|app| app.name)
            .collect();
        assert_eq!(names, vec!["auth", "billing"]);
        assert_eq!(apps.get_application_list(&ctx).await.unwrap().len(), 3);
        assert!(apps.initialize_application(&ctx, info(" ", None)).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_archive_waits_for_in_flight_save() {
        let storage = Arc::new(GatedStorage::new());
        let apps = Arc::new(InMemoryApplicationLifecycle::new(storage.clone()));
        let ctx = RequestContext::new();
        let id = apps.initialize_application(&ctx, info("auth", None)).await.unwrap().application_id;

        let save = tokio::spawn({
            let apps = apps.clone();
            let info = tx(&id);
            async move {
                let ctx = RequestContext::new();
                apps.save_transaction(&ctx, info).await
            }
        });
        storage.entered.notified().await;

        let archive = tokio::spawn({
            let apps = apps.clone();
            let id = id.clone();
            async move {
                let ctx = RequestContext::new();
                apps.archive_application_by_id(&ctx, &id).await
            }
        });
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!archive.is_finished());
        assert_eq!(
            apps.get_application_by_id(&ctx, &id).await.unwrap().status,
            ApplicationStatus::Enabled
        );

        storage.release.notify_one();
        save.await.unwrap().unwrap();
        archive.await.unwrap().unwrap();

        assert_eq!(
            apps.get_application_by_id(&ctx, &id).await.unwrap().status,
            ApplicationStatus::Archived
        );
        assert!(apps.save_transaction(&ctx, tx(&id)).await.unwrap_err().is_internal());
        let page = storage
            .inner
            .get_transactions(&ctx, &TransactionFilter::for_application(id.clone()))
            .await
            .unwrap();
        assert_eq!(page.count, 1);
    }
}
