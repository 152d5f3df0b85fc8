// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Recording stubs shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::stream::{BoxStream, StreamExt};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

use vantage_core::application::agent::AgentRegistry;
use vantage_core::application::errors::ServiceError;
use vantage_core::application::gateway::{BackendGroup, Gateway};
use vantage_core::application::lifecycle::ApplicationLifecycle;
use vantage_core::application::monitoring::MonitoringControl;
use vantage_core::application::storage::StorageService;
use vantage_core::domain::agent::{
    AgentId, AgentItem, AgentStatus, MetricsReceipt, RegisterAgentRequest, RegisterAgentResponse,
    UnregisterAgentResponse,
};
use vantage_core::domain::application::{
    Application, ApplicationId, ApplicationInfo, ApplicationStatus, InitializedApplication,
};
use vantage_core::domain::context::RequestContext;
use vantage_core::domain::repository::{RepositoryError, TelemetryRepository};
use vantage_core::domain::scheduler::{
    AddSchedulerRequest, Scheduler, SchedulerAck, SchedulerConfig, SchedulerId, SchedulerStatus,
};
use vantage_core::domain::snapshot::{
    SchedulerInformation, SchedulerInformationQuery, SchedulerUptime, SchedulerUptimeQuery, Snapshot,
};
use vantage_core::domain::stat::{
    AgentInformation, AgentStatQuery, CpuInfo, CpuLoad, DiskInfo, DiskUsage, InterfaceCounters, MemoryInfo,
    MemoryUsage, NetInfo, StatCategory, StatMetric, Statistic, StatWindow,
};
use vantage_core::domain::transaction::{
    TransactionFilter, TransactionGroupFilter, TransactionGroups, TransactionId, TransactionInfo,
    TransactionPage, TransactionStatus, TransactionTree, TransactionType,
};

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_750_000_000 + secs, 0).unwrap()
}

pub fn transaction(id: &str, parent: Option<&str>) -> TransactionInfo {
    TransactionInfo {
        id: TransactionId::from(id),
        parent_id: parent.map(TransactionId::from),
        application_id: ApplicationId::from("app-1"),
        name: format!("span {}", id),
        host: "api.local".to_string(),
        path: "/checkout".to_string(),
        method: "POST".to_string(),
        transaction_type: TransactionType::Http,
        status: TransactionStatus::Success,
        error: None,
        started_at: at(0),
        ended_at: at(1),
        meta: BTreeMap::new(),
    }
}

// Persistence

/// Marker count returned by each stat query so callers can tell which one ran
pub const ALL_MARKER: u64 = 100;
pub const CPU_MARKER: u64 = 101;
pub const MEMORY_MARKER: u64 = 102;
pub const DISK_MARKER: u64 = 103;
pub const NET_MARKER: u64 = 104;

fn cpu(marker: u64) -> CpuInfo {
    CpuInfo {
        cpus: vec![CpuLoad { load: marker as f64 / 4.0 }],
    }
}

fn net(marker: u64) -> NetInfo {
    NetInfo {
        interfaces: BTreeMap::from([(
            "eth0".to_string(),
            InterfaceCounters {
                bytes_sent: marker * 1024,
                bytes_recv: marker * 2048,
                packets_sent: marker,
                packets_recv: marker * 2,
                err_in: 0,
                err_out: 0,
                drop_in: 1,
                drop_out: 0,
            },
        )]),
    }
}

/// The page each stat query returns: one row whose timestamp and payload
/// differ per category, counted with the category's marker
pub fn stat_fixture(category: StatCategory) -> AgentInformation {
    let marker = match category {
        StatCategory::All => ALL_MARKER,
        StatCategory::Cpu => CPU_MARKER,
        StatCategory::Memory => MEMORY_MARKER,
        StatCategory::Disk => DISK_MARKER,
        StatCategory::Net => NET_MARKER,
    };
    let mut stat = Statistic {
        time: at(marker as i64),
        cpu_info: None,
        memory_info: None,
        disk_info: None,
        net_info: None,
    };
    match category {
        StatCategory::All => {
            stat.cpu_info = Some(cpu(marker));
            stat.net_info = Some(net(marker));
        }
        StatCategory::Cpu => stat.cpu_info = Some(cpu(marker)),
        StatCategory::Memory => {
            stat.memory_info = Some(MemoryInfo {
                mem: Some(MemoryUsage {
                    total: marker * 1000,
                    used: marker * 250,
                    free: marker * 750,
                    shared: 0,
                    used_percent: 25.0,
                }),
                swap: None,
            })
        }
        StatCategory::Disk => {
            stat.disk_info = Some(DiskInfo {
                disks: BTreeMap::from([(
                    "/".to_string(),
                    DiskUsage {
                        total: marker * 1000,
                        free: marker * 600,
                        used: marker * 400,
                        used_percent: 40.0,
                    },
                )]),
            })
        }
        StatCategory::Net => stat.net_info = Some(net(marker)),
    }
    AgentInformation {
        stats: vec![stat],
        count: marker,
    }
}

#[derive(Default)]
pub struct StubRepository {
    calls: Mutex<Vec<&'static str>>,
    failure: Option<String>,
    children: Vec<TransactionInfo>,
}

impl StubRepository {
    pub fn working() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Returns `children` verbatim from `get_transaction_by_id`
    pub fn with_children(children: Vec<TransactionInfo>) -> Self {
        Self {
            children,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls.lock().iter().filter(|m| **m == method).count()
    }

    fn record<T>(&self, method: &'static str, value: T) -> Result<T, RepositoryError> {
        self.calls.lock().push(method);
        match &self.failure {
            Some(message) => Err(RepositoryError::Database(message.clone())),
            None => Ok(value),
        }
    }
}

#[async_trait]
impl TelemetryRepository for StubRepository {
    async fn insert_snapshot(&self, _ctx: &RequestContext, _snapshot: &Snapshot) -> Result<(), RepositoryError> {
        self.record("insert_snapshot", ())
    }

    async fn insert_stat_metric(&self, _ctx: &RequestContext, _metric: &StatMetric) -> Result<(), RepositoryError> {
        self.record("insert_stat_metric", ())
    }

    async fn insert_transaction_info(&self, _ctx: &RequestContext, _info: &TransactionInfo) -> Result<(), RepositoryError> {
        self.record("insert_transaction_info", ())
    }

    async fn get_snapshots(
        &self,
        _ctx: &RequestContext,
        _query: &SchedulerInformationQuery,
    ) -> Result<SchedulerInformation, RepositoryError> {
        self.record(
            "get_snapshots",
            SchedulerInformation {
                snapshots: Vec::new(),
                count: 42,
            },
        )
    }

    async fn get_snapshots_uptime(
        &self,
        _ctx: &RequestContext,
        _query: &SchedulerUptimeQuery,
    ) -> Result<SchedulerUptime, RepositoryError> {
        self.record(
            "get_snapshots_uptime",
            SchedulerUptime {
                uptime: 0.99,
                latency_ms: 12.0,
            },
        )
    }

    async fn get_stat_info(&self, _ctx: &RequestContext, _window: &StatWindow) -> Result<AgentInformation, RepositoryError> {
        self.record("get_stat_info", stat_fixture(StatCategory::All))
    }

    async fn get_cpu_info(&self, _ctx: &RequestContext, _window: &StatWindow) -> Result<AgentInformation, RepositoryError> {
        self.record("get_cpu_info", stat_fixture(StatCategory::Cpu))
    }

    async fn get_memory_info(&self, _ctx: &RequestContext, _window: &StatWindow) -> Result<AgentInformation, RepositoryError> {
        self.record("get_memory_info", stat_fixture(StatCategory::Memory))
    }

    async fn get_disk_info(&self, _ctx: &RequestContext, _window: &StatWindow) -> Result<AgentInformation, RepositoryError> {
        self.record("get_disk_info", stat_fixture(StatCategory::Disk))
    }

    async fn get_net_info(&self, _ctx: &RequestContext, _window: &StatWindow) -> Result<AgentInformation, RepositoryError> {
        self.record("get_net_info", stat_fixture(StatCategory::Net))
    }

    async fn get_transaction_info(
        &self,
        _ctx: &RequestContext,
        _filter: &TransactionFilter,
    ) -> Result<TransactionPage, RepositoryError> {
        self.record(
            "get_transaction_info",
            TransactionPage {
                transactions: vec![transaction("t-1", None)],
                count: 7,
            },
        )
    }

    async fn get_transaction_by_id(
        &self,
        _ctx: &RequestContext,
        id: &TransactionId,
    ) -> Result<TransactionTree, RepositoryError> {
        self.record(
            "get_transaction_by_id",
            TransactionTree {
                transaction: transaction(id.as_str(), None),
                children: self.children.clone(),
            },
        )
    }

    async fn get_transaction_group(
        &self,
        _ctx: &RequestContext,
        _filter: &TransactionGroupFilter,
    ) -> Result<TransactionGroups, RepositoryError> {
        self.record("get_transaction_group", TransactionGroups::new())
    }
}

// Backend groups

pub fn agent_item(id: &AgentId) -> AgentItem {
    AgentItem {
        id: id.clone(),
        agent_name: "edge-01".to_string(),
        status: AgentStatus::Registered,
        host_info: None,
    }
}

pub fn scheduler(id: &SchedulerId) -> Scheduler {
    Scheduler {
        id: id.clone(),
        name: None,
        interval_secs: 30,
        timeout_secs: 5,
        status: SchedulerStatus::Stopped,
        config: SchedulerConfig::Tcp {
            host: "db.local".to_string(),
            port: 5432,
        },
    }
}

pub fn application(id: &ApplicationId) -> Application {
    Application {
        id: id.clone(),
        name: "checkout".to_string(),
        host_name: None,
        port: None,
        agent_id: None,
        agent_name: None,
        status: ApplicationStatus::Enabled,
    }
}

pub fn add_scheduler_request() -> AddSchedulerRequest {
    AddSchedulerRequest {
        name: Some("db".to_string()),
        interval_secs: 30,
        timeout_secs: 5,
        config: SchedulerConfig::Tcp {
            host: "db.local".to_string(),
            port: 5432,
        },
    }
}

pub fn application_info() -> ApplicationInfo {
    ApplicationInfo {
        name: "checkout".to_string(),
        host_name: None,
        port: None,
        agent_id: None,
        agent_name: None,
    }
}

/// Implements all four backend groups and records which group each call
/// arrived on. Succeeds or fails uniformly.
pub struct StubBackends {
    calls: Mutex<Vec<(BackendGroup, &'static str)>>,
    fail: bool,
}

impl StubBackends {
    pub fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail,
        })
    }

    pub fn gateway(self: &Arc<Self>) -> Gateway {
        Gateway::new(self.clone(), self.clone(), self.clone(), self.clone())
    }

    pub fn groups(&self) -> Vec<BackendGroup> {
        self.calls.lock().iter().map(|(group, _)| *group).collect()
    }

    pub fn calls(&self) -> Vec<(BackendGroup, &'static str)> {
        self.calls.lock().clone()
    }

    fn record<T>(&self, group: BackendGroup, call: &'static str, value: T) -> Result<T, ServiceError> {
        self.calls.lock().push((group, call));
        if self.fail {
            Err(ServiceError::Internal(format!("{} unavailable", group.as_str())))
        } else {
            Ok(value)
        }
    }
}

#[async_trait]
impl AgentRegistry for StubBackends {
    async fn register(
        &self,
        _ctx: &RequestContext,
        _request: RegisterAgentRequest,
    ) -> Result<RegisterAgentResponse, ServiceError> {
        self.record(BackendGroup::AgentRegistry, "register", RegisterAgentResponse { id: "a1".into() })
    }

    async fn unregister(
        &self,
        _ctx: &RequestContext,
        id: &AgentId,
    ) -> Result<UnregisterAgentResponse, ServiceError> {
        self.record(BackendGroup::AgentRegistry, "unregister", UnregisterAgentResponse { id: id.clone() })
    }

    async fn get_by_agent_name(
        &self,
        _ctx: &RequestContext,
        _agent_name: &str,
    ) -> Result<Vec<AgentItem>, ServiceError> {
        self.record(BackendGroup::AgentRegistry, "get_by_agent_name", vec![agent_item(&"a1".into())])
    }

    async fn get_agent_by_id(&self, _ctx: &RequestContext, id: &AgentId) -> Result<AgentItem, ServiceError> {
        self.record(BackendGroup::AgentRegistry, "get_agent_by_id", agent_item(id))
    }

    async fn get_agent_list(&self, _ctx: &RequestContext) -> Result<Vec<AgentItem>, ServiceError> {
        self.record(BackendGroup::AgentRegistry, "get_agent_list", Vec::new())
    }

    async fn send_metrics(
        &self,
        _ctx: &RequestContext,
        metrics: BoxStream<'static, StatMetric>,
    ) -> Result<MetricsReceipt, ServiceError> {
        let accepted = metrics.count().await as u64;
        self.record(BackendGroup::AgentRegistry, "send_metrics", MetricsReceipt { accepted })
    }
}

#[async_trait]
impl MonitoringControl for StubBackends {
    async fn get_scheduler_list(&self, _ctx: &RequestContext) -> Result<Vec<Scheduler>, ServiceError> {
        self.record(BackendGroup::Monitoring, "get_scheduler_list", Vec::new())
    }

    async fn get_scheduler_by_id(&self, _ctx: &RequestContext, id: &SchedulerId) -> Result<Scheduler, ServiceError> {
        self.record(BackendGroup::Monitoring, "get_scheduler_by_id", scheduler(id))
    }

    async fn add(&self, _ctx: &RequestContext, _request: AddSchedulerRequest) -> Result<SchedulerAck, ServiceError> {
        self.record(BackendGroup::Monitoring, "add", SchedulerAck { id: "s1".into() })
    }

    async fn remove(&self, _ctx: &RequestContext, id: &SchedulerId) -> Result<SchedulerAck, ServiceError> {
        self.record(BackendGroup::Monitoring, "remove", SchedulerAck { id: id.clone() })
    }

    async fn run(&self, _ctx: &RequestContext, id: &SchedulerId) -> Result<SchedulerAck, ServiceError> {
        self.record(BackendGroup::Monitoring, "run", SchedulerAck { id: id.clone() })
    }

    async fn stop(&self, _ctx: &RequestContext, id: &SchedulerId) -> Result<SchedulerAck, ServiceError> {
        self.record(BackendGroup::Monitoring, "stop", SchedulerAck { id: id.clone() })
    }
}

#[async_trait]
impl StorageService for StubBackends {
    async fn save_snapshot(&self, _ctx: &RequestContext, _snapshot: Snapshot) -> Result<(), ServiceError> {
        self.record(BackendGroup::Storage, "save_snapshot", ())
    }

    async fn save_stat_metric(&self, _ctx: &RequestContext, _metric: StatMetric) -> Result<(), ServiceError> {
        self.record(BackendGroup::Storage, "save_stat_metric", ())
    }

    async fn save_transaction(&self, _ctx: &RequestContext, _info: TransactionInfo) -> Result<(), ServiceError> {
        self.record(BackendGroup::Storage, "save_transaction", ())
    }

    async fn get_scheduler_information(
        &self,
        _ctx: &RequestContext,
        _query: &SchedulerInformationQuery,
    ) -> Result<SchedulerInformation, ServiceError> {
        self.record(BackendGroup::Storage, "get_scheduler_information", SchedulerInformation::default())
    }

    async fn get_scheduler_uptime(
        &self,
        _ctx: &RequestContext,
        _query: &SchedulerUptimeQuery,
    ) -> Result<SchedulerUptime, ServiceError> {
        self.record(BackendGroup::Storage, "get_scheduler_uptime", SchedulerUptime::default())
    }

    async fn get_agent_information(
        &self,
        _ctx: &RequestContext,
        _query: &AgentStatQuery,
    ) -> Result<AgentInformation, ServiceError> {
        self.record(BackendGroup::Storage, "get_agent_information", AgentInformation::default())
    }

    async fn get_transactions(
        &self,
        _ctx: &RequestContext,
        _filter: &TransactionFilter,
    ) -> Result<TransactionPage, ServiceError> {
        self.record(BackendGroup::Storage, "get_transactions", TransactionPage::default())
    }

    async fn get_transaction_by_id(
        &self,
        _ctx: &RequestContext,
        id: &TransactionId,
    ) -> Result<TransactionTree, ServiceError> {
        self.record(
            BackendGroup::Storage,
            "get_transaction_by_id",
            TransactionTree {
                transaction: transaction(id.as_str(), None),
                children: Vec::new(),
            },
        )
    }

    async fn get_transactions_group(
        &self,
        _ctx: &RequestContext,
        _filter: &TransactionGroupFilter,
    ) -> Result<TransactionGroups, ServiceError> {
        self.record(BackendGroup::Storage, "get_transactions_group", TransactionGroups::new())
    }
}

#[async_trait]
impl ApplicationLifecycle for StubBackends {
    async fn initialize_application(
        &self,
        _ctx: &RequestContext,
        _info: ApplicationInfo,
    ) -> Result<InitializedApplication, ServiceError> {
        self.record(
            BackendGroup::ApplicationLifecycle,
            "initialize_application",
            InitializedApplication {
                application_id: "app-1".into(),
            },
        )
    }

    async fn save_transaction(&self, _ctx: &RequestContext, _info: TransactionInfo) -> Result<(), ServiceError> {
        self.record(BackendGroup::ApplicationLifecycle, "save_transaction", ())
    }

    async fn get_application_by_id(
        &self,
        _ctx: &RequestContext,
        id: &ApplicationId,
    ) -> Result<Application, ServiceError> {
        self.record(BackendGroup::ApplicationLifecycle, "get_application_by_id", application(id))
    }

    async fn get_application_list(&self, _ctx: &RequestContext) -> Result<Vec<Application>, ServiceError> {
        self.record(BackendGroup::ApplicationLifecycle, "get_application_list", Vec::new())
    }

    async fn get_application_list_by_agent_id(
        &self,
        _ctx: &RequestContext,
        _agent_id: &AgentId,
    ) -> Result<Vec<Application>, ServiceError> {
        self.record(BackendGroup::ApplicationLifecycle, "get_application_list_by_agent_id", Vec::new())
    }

    async fn archive_application_by_id(&self, _ctx: &RequestContext, _id: &ApplicationId) -> Result<(), ServiceError> {
        self.record(BackendGroup::ApplicationLifecycle, "archive_application_by_id", ())
    }

    async fn enable_application_by_id(&self, _ctx: &RequestContext, _id: &ApplicationId) -> Result<(), ServiceError> {
        self.record(BackendGroup::ApplicationLifecycle, "enable_application_by_id", ())
    }

    async fn disable_application_by_id(&self, _ctx: &RequestContext, _id: &ApplicationId) -> Result<(), ServiceError> {
        self.record(BackendGroup::ApplicationLifecycle, "disable_application_by_id", ())
    }
}
