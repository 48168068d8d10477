//! 수명주기 검증기 설정
//!
//! [`VerifierConfig`]는 core의 [`OrchestratorConfig`]와 [`ProjectConfig`]를
//! 기반으로 검증기 전용 설정을 제공합니다. 프로필 이름이나 파일 경로를 위치 인자
//! 목록 대신 이름 있는 필드로 다룹니다.
//!
//! # 사용 예시
//! ```
//! use composecheck_core::config::ComposeCheckConfig;
//! use composecheck_lifecycle::config::VerifierConfig;
//!
//! let core_config = ComposeCheckConfig::default();
//! let config = VerifierConfig::from_core(&core_config.orchestrator, &core_config.project);
//! assert_eq!(config.runtime_binary, "podman");
//! ```

use std::path::PathBuf;
use std::time::Duration;

use composecheck_core::config::{MAX_COMMAND_TIMEOUT_SECS, OrchestratorConfig, ProjectConfig};
use serde::{Deserialize, Serialize};

use crate::error::LifecycleError;

/// 수명주기 검증기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// compose 도구 argv 접두어
    pub compose_command: Vec<String>,
    /// 상태 조회용 컨테이너 런타임 바이너리
    pub runtime_binary: String,
    /// 서비스 이름 라벨
    pub service_label: String,
    /// 명령 하나당 타임아웃 (초)
    pub command_timeout_secs: u64,
    /// compose 매니페스트 파일
    pub compose_file: PathBuf,
    /// env 파일
    pub env_file: PathBuf,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self::from_core(&OrchestratorConfig::default(), &ProjectConfig::default())
    }
}

impl VerifierConfig {
    /// core 설정 섹션에서 검증기 설정을 생성합니다.
    pub fn from_core(orchestrator: &OrchestratorConfig, project: &ProjectConfig) -> Self {
        Self {
            compose_command: orchestrator.compose_command.clone(),
            runtime_binary: orchestrator.runtime_binary.clone(),
            service_label: orchestrator.service_label.clone(),
            command_timeout_secs: orchestrator.command_timeout_secs,
            compose_file: PathBuf::from(&project.compose_file),
            env_file: PathBuf::from(&project.env_file),
        }
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.compose_command.is_empty()
            || self.compose_command.iter().any(|a| a.trim().is_empty())
        {
            return Err(LifecycleError::Config {
                field: "compose_command".to_owned(),
                reason: "must be a non-empty list of non-empty arguments".to_owned(),
            });
        }

        if self.runtime_binary.trim().is_empty() {
            return Err(LifecycleError::Config {
                field: "runtime_binary".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.service_label.is_empty()
            || self.service_label.contains(['"', '{', '}', '\\'])
        {
            return Err(LifecycleError::Config {
                field: "service_label".to_owned(),
                reason: "must be non-empty and must not contain quotes, braces or backslashes"
                    .to_owned(),
            });
        }

        if self.command_timeout_secs == 0 || self.command_timeout_secs > MAX_COMMAND_TIMEOUT_SECS
        {
            return Err(LifecycleError::Config {
                field: "command_timeout_secs".to_owned(),
                reason: format!("must be 1-{MAX_COMMAND_TIMEOUT_SECS}"),
            });
        }

        if self.compose_file.as_os_str().is_empty() {
            return Err(LifecycleError::Config {
                field: "compose_file".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.env_file.as_os_str().is_empty() {
            return Err(LifecycleError::Config {
                field: "env_file".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        Ok(())
    }
}

/// 검증기 설정 빌더
#[derive(Default)]
pub struct VerifierConfigBuilder {
    config: VerifierConfig,
}

impl VerifierConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// compose 도구 argv 접두어를 설정합니다.
    pub fn compose_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.compose_command = command.into_iter().map(Into::into).collect();
        self
    }

    /// 런타임 바이너리를 설정합니다.
    pub fn runtime_binary(mut self, binary: impl Into<String>) -> Self {
        self.config.runtime_binary = binary.into();
        self
    }

    /// 서비스 라벨을 설정합니다.
    pub fn service_label(mut self, label: impl Into<String>) -> Self {
        self.config.service_label = label.into();
        self
    }

    /// 명령 타임아웃(초)을 설정합니다.
    pub fn command_timeout_secs(mut self, secs: u64) -> Self {
        self.config.command_timeout_secs = secs;
        self
    }

    /// compose 파일 경로를 설정합니다.
    pub fn compose_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.compose_file = path.into();
        self
    }

    /// env 파일 경로를 설정합니다.
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.env_file = path.into();
        self
    }

    /// 설정을 검증하고 `VerifierConfig`를 생성합니다.
    pub fn build(self) -> Result<VerifierConfig, LifecycleError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
