// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Instrumented applications and their lifecycle.
//!
//! Status only changes through [`Application::enable`], [`Application::disable`]
//! and [`Application::archive`]. `Archived` is terminal.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::agent::AgentId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ApplicationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApplicationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ApplicationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Unknown,
    Enabled,
    Disabled,
    Archived,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("application {0} is archived")]
    Archived(ApplicationId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<AgentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    pub status: ApplicationStatus,
}

impl Application {
    /// New applications start `Enabled`
    pub fn initialize(info: ApplicationInfo) -> Self {
        Self {
            id: ApplicationId::new(),
            name: info.name,
            host_name: info.host_name,
            port: info.port,
            agent_id: info.agent_id,
            agent_name: info.agent_name,
            status: ApplicationStatus::Enabled,
        }
    }

    pub fn enable(&mut self) -> Result<(), LifecycleError> {
        self.transition(ApplicationStatus::Enabled)
    }

    pub fn disable(&mut self) -> Result<(), LifecycleError> {
        self.transition(ApplicationStatus::Disabled)
    }

    pub fn archive(&mut self) -> Result<(), LifecycleError> {
        self.transition(ApplicationStatus::Archived)
    }

    fn transition(&mut self, next: ApplicationStatus) -> Result<(), LifecycleError> {
        if self.status == ApplicationStatus::Archived {
            return Err(LifecycleError::Archived(self.id.clone()));
        }
        self.status = next;
        Ok(())
    }
}

/// Registration payload sent by an instrumented application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<AgentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializedApplication {
    pub application_id: ApplicationId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> Application {
        Application::initialize(ApplicationInfo {
            name: "checkout".to_string(),
            host_name: Some("checkout.local".to_string()),
            port: Some(8080),
            agent_id: None,
            agent_name: None,
        })
    }

    #[test]
    fn test_initialized_application_is_enabled() {
        assert_eq!(app().status, ApplicationStatus::Enabled);
    }

    #[test]
    fn test_disable_then_enable() {
        let mut app = app();
        app.disable().unwrap();
        assert_eq!(app.status, ApplicationStatus::Disabled);
        app.enable().unwrap();
        assert_eq!(app.status, ApplicationStatus::Enabled);
    }

    #[test]
    fn test_archived_is_terminal() {
        let mut app = app();
        app.archive().unwrap();
        assert_eq!(app.enable(), Err(LifecycleError::Archived(app.id.clone())));
        assert!(app.disable().is_err());
        assert!(app.archive().is_err());
        assert_eq!(app.status, ApplicationStatus::Archived);
    }
}
