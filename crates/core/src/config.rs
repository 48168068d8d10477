//! 설정 관리: composecheck.toml 파싱 및 런타임 설정
//!
//! [`ComposeCheckConfig`]는 모든 섹션을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`COMPOSECHECK_ORCHESTRATOR_RUNTIME_BINARY=docker` 형식)
//! 3. 설정 파일 (`composecheck.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! `[project]`의 상대 경로는 설정 파일이 있는 디렉토리를 기준으로 해석됩니다.
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), composecheck_core::error::ComposeCheckError> {
//! use composecheck_core::config::ComposeCheckConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = ComposeCheckConfig::load("composecheck.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = ComposeCheckConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ComposeCheckError, ConfigError};

/// 명령 타임아웃 상한 (초)
pub const MAX_COMMAND_TIMEOUT_SECS: u64 = 3600;

/// composecheck 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeCheckConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 오케스트레이터 호출 설정
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    /// 검증 대상 프로젝트 파일
    #[serde(default)]
    pub project: ProjectConfig,
    /// 명시적 시나리오 목록 (비어 있으면 프로필 조합을 자동 생성)
    #[serde(default)]
    pub scenarios: Vec<ScenarioConfig>,
}

impl ComposeCheckConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 프로젝트 상대 경로를 설정 파일 기준으로 변환
    /// 4. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ComposeCheckError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        if let Some(base) = path.parent() {
            config.project.resolve_relative_to(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ComposeCheckError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ComposeCheckError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                ComposeCheckError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, ComposeCheckError> {
        toml::from_str(toml_str).map_err(|e| {
            ComposeCheckError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `COMPOSECHECK_{SECTION}_{FIELD}`
    /// 목록 필드는 쉼표로 구분합니다.
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "COMPOSECHECK_GENERAL_LOG_LEVEL");
        override_string(
            &mut self.general.log_format,
            "COMPOSECHECK_GENERAL_LOG_FORMAT",
        );

        // Orchestrator
        override_csv(
            &mut self.orchestrator.compose_command,
            "COMPOSECHECK_ORCHESTRATOR_COMPOSE_COMMAND",
        );
        override_string(
            &mut self.orchestrator.runtime_binary,
            "COMPOSECHECK_ORCHESTRATOR_RUNTIME_BINARY",
        );
        override_string(
            &mut self.orchestrator.service_label,
            "COMPOSECHECK_ORCHESTRATOR_SERVICE_LABEL",
        );
        override_u64(
            &mut self.orchestrator.command_timeout_secs,
            "COMPOSECHECK_ORCHESTRATOR_COMMAND_TIMEOUT_SECS",
        );

        // Project
        override_string(
            &mut self.project.compose_file,
            "COMPOSECHECK_PROJECT_COMPOSE_FILE",
        );
        override_string(&mut self.project.env_file, "COMPOSECHECK_PROJECT_ENV_FILE");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ComposeCheckError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.orchestrator.compose_command.is_empty()
            || self
                .orchestrator
                .compose_command
                .iter()
                .any(|arg| arg.trim().is_empty())
        {
            return Err(invalid(
                "orchestrator.compose_command",
                "must be a non-empty list of non-empty arguments",
            ));
        }

        if self.orchestrator.runtime_binary.trim().is_empty() {
            return Err(invalid("orchestrator.runtime_binary", "must not be empty"));
        }

        // 라벨은 Go 템플릿의 문자열 리터럴 안에 들어갑니다.
        let label = &self.orchestrator.service_label;
        if label.is_empty() || label.contains(['"', '{', '}', '\\']) {
            return Err(invalid(
                "orchestrator.service_label",
                "must be non-empty and must not contain quotes, braces or backslashes",
            ));
        }

        let timeout = self.orchestrator.command_timeout_secs;
        if timeout == 0 || timeout > MAX_COMMAND_TIMEOUT_SECS {
            return Err(invalid(
                "orchestrator.command_timeout_secs",
                format!("must be 1-{MAX_COMMAND_TIMEOUT_SECS}"),
            ));
        }

        if self.project.compose_file.trim().is_empty() {
            return Err(invalid("project.compose_file", "must not be empty"));
        }
        if self.project.env_file.trim().is_empty() {
            return Err(invalid("project.env_file", "must not be empty"));
        }

        let mut names = HashSet::new();
        for (idx, scenario) in self.scenarios.iter().enumerate() {
            if scenario.name.trim().is_empty() {
                return Err(invalid(
                    &format!("scenarios[{idx}].name"),
                    "must not be empty",
                ));
            }
            if !names.insert(scenario.name.as_str()) {
                return Err(invalid(
                    &format!("scenarios[{idx}].name"),
                    format!("duplicate scenario name '{}'", scenario.name),
                ));
            }
            if scenario.profiles.iter().any(|p| p.trim().is_empty()) {
                return Err(invalid(
                    &format!("scenarios[{idx}].profiles"),
                    "profile names must not be empty",
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ComposeCheckError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 오케스트레이터 호출 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// compose 도구 실행 명령 (argv 접두어, 예: `["python3", "podman_compose.py"]`)
    pub compose_command: Vec<String>,
    /// 실행 상태 조회에 사용할 컨테이너 런타임 바이너리
    pub runtime_binary: String,
    /// 서비스 이름이 담긴 컨테이너 라벨
    pub service_label: String,
    /// 외부 명령 하나당 타임아웃 (초)
    pub command_timeout_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            compose_command: vec!["podman-compose".to_owned()],
            runtime_binary: "podman".to_owned(),
            service_label: "com.docker.compose.service".to_owned(),
            command_timeout_secs: 300,
        }
    }
}

/// 검증 대상 프로젝트 파일 경로
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// compose 매니페스트 파일
    pub compose_file: String,
    /// 매니페스트 변수 치환용 env 파일
    pub env_file: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            compose_file: "docker-compose.yml".to_owned(),
            env_file: ".env".to_owned(),
        }
    }
}

impl ProjectConfig {
    /// 상대 경로를 `base` 디렉토리 기준 경로로 바꿉니다.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        resolve_path(&mut self.compose_file, base);
        resolve_path(&mut self.env_file, base);
    }
}

fn resolve_path(target: &mut String, base: &Path) {
    let path = Path::new(target.as_str());
    if path.is_relative() && !base.as_os_str().is_empty() {
        *target = base.join(path).display().to_string();
    }
}

/// 시나리오 선언
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// 시나리오 이름 (리포트 표시용, 유일해야 함)
    pub name: String,
    /// 활성화할 프로필
    #[serde(default)]
    pub profiles: Vec<String>,
    /// 선언된 기대 서비스 (있으면 기대 계산 결과와 일치해야 함)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Vec<String>>,
}

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split(',').map(|s| s.trim().to_owned()).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = ComposeCheckConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.orchestrator.compose_command, vec!["podman-compose"]);
        assert_eq!(config.orchestrator.runtime_binary, "podman");
        assert_eq!(
            config.orchestrator.service_label,
            "com.docker.compose.service"
        );
        assert_eq!(config.orchestrator.command_timeout_secs, 300);
        assert!(config.scenarios.is_empty());
    }

    #[test]
    fn default_config_is_valid() {
        ComposeCheckConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_full_config() {
        let config = ComposeCheckConfig::parse(
            r#"
[general]
log_level = "debug"
log_format = "json"

[orchestrator]
compose_command = ["python3", "podman_compose.py"]
runtime_binary = "podman"
command_timeout_secs = 60

[project]
compose_file = "profile/docker-compose.yml"
env_file = "profile/profile.env"

[[scenarios]]
name = "defaults only"

[[scenarios]]
name = "profile-1"
profiles = ["profile-1"]
expected = ["default-service", "service-1"]
"#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(
            config.orchestrator.compose_command,
            vec!["python3", "podman_compose.py"]
        );
        assert_eq!(config.orchestrator.command_timeout_secs, 60);
        assert_eq!(config.scenarios.len(), 2);
        assert!(config.scenarios[0].profiles.is_empty());
        assert!(config.scenarios[0].expected.is_none());
        assert_eq!(
            config.scenarios[1].expected.as_deref(),
            Some(&["default-service".to_owned(), "service-1".to_owned()][..])
        );
    }

    #[test]
    fn parse_partial_config_fills_defaults() {
        let config = ComposeCheckConfig::parse("[general]\nlog_level = \"warn\"\n").unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.orchestrator.runtime_binary, "podman");
        assert_eq!(config.project.compose_file, "docker-compose.yml");
    }

    #[test]
    fn parse_invalid_toml_is_error() {
        let result = ComposeCheckConfig::parse("[general\nlog_level = 1");
        assert!(matches!(
            result,
            Err(ComposeCheckError::Config(ConfigError::ParseFailed { .. }))
        ));
    }

    #[test]
    fn validate_rejects_unknown_log_level() {
        let mut config = ComposeCheckConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("general.log_level"));
    }

    #[test]
    fn validate_rejects_unknown_log_format() {
        let mut config = ComposeCheckConfig::default();
        config.general.log_format = "xml".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_compose_command() {
        let mut config = ComposeCheckConfig::default();
        config.orchestrator.compose_command.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("orchestrator.compose_command"));

        config.orchestrator.compose_command = vec!["python3".to_owned(), " ".to_owned()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_label_that_breaks_template() {
        let mut config = ComposeCheckConfig::default();
        config.orchestrator.service_label = "a\"b".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("orchestrator.service_label"));
    }

    #[test]
    fn validate_rejects_timeout_out_of_range() {
        let mut config = ComposeCheckConfig::default();
        config.orchestrator.command_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.orchestrator.command_timeout_secs = MAX_COMMAND_TIMEOUT_SECS + 1;
        assert!(config.validate().is_err());
        config.orchestrator.command_timeout_secs = MAX_COMMAND_TIMEOUT_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_scenario_names() {
        let mut config = ComposeCheckConfig::default();
        for _ in 0..2 {
            config.scenarios.push(ScenarioConfig {
                name: "same".to_owned(),
                profiles: Vec::new(),
                expected: None,
            });
        }
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate scenario name"));
    }

    #[test]
    fn validate_rejects_empty_profile_name() {
        let mut config = ComposeCheckConfig::default();
        config.scenarios.push(ScenarioConfig {
            name: "blank".to_owned(),
            profiles: vec![String::new()],
            expected: None,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolve_relative_paths_against_base() {
        let mut project = ProjectConfig {
            compose_file: "profile/docker-compose.yml".to_owned(),
            env_file: "/abs/profile.env".to_owned(),
        };
        project.resolve_relative_to(Path::new("/srv/tests"));
        assert_eq!(project.compose_file, "/srv/tests/profile/docker-compose.yml");
        assert_eq!(project.env_file, "/abs/profile.env");
    }

    #[test]
    fn resolve_with_empty_base_keeps_paths() {
        let mut project = ProjectConfig::default();
        project.resolve_relative_to(Path::new(""));
        assert_eq!(project.compose_file, "docker-compose.yml");
    }

    #[test]
    #[serial]
    fn env_overrides_replace_values() {
        // SAFETY: serial 테스트에서만 환경변수를 수정합니다.
        unsafe {
            std::env::set_var("COMPOSECHECK_ORCHESTRATOR_RUNTIME_BINARY", "docker");
            std::env::set_var(
                "COMPOSECHECK_ORCHESTRATOR_COMPOSE_COMMAND",
                "docker, compose",
            );
            std::env::set_var("COMPOSECHECK_ORCHESTRATOR_COMMAND_TIMEOUT_SECS", "42");
        }

        let mut config = ComposeCheckConfig::default();
        config.apply_env_overrides();

        unsafe {
            std::env::remove_var("COMPOSECHECK_ORCHESTRATOR_RUNTIME_BINARY");
            std::env::remove_var("COMPOSECHECK_ORCHESTRATOR_COMPOSE_COMMAND");
            std::env::remove_var("COMPOSECHECK_ORCHESTRATOR_COMMAND_TIMEOUT_SECS");
        }

        assert_eq!(config.orchestrator.runtime_binary, "docker");
        assert_eq!(config.orchestrator.compose_command, vec!["docker", "compose"]);
        assert_eq!(config.orchestrator.command_timeout_secs, 42);
    }

    #[test]
    #[serial]
    fn env_override_with_bad_number_is_ignored() {
        unsafe {
            std::env::set_var("COMPOSECHECK_ORCHESTRATOR_COMMAND_TIMEOUT_SECS", "soon");
        }

        let mut config = ComposeCheckConfig::default();
        config.apply_env_overrides();

        unsafe {
            std::env::remove_var("COMPOSECHECK_ORCHESTRATOR_COMMAND_TIMEOUT_SECS");
        }

        assert_eq!(config.orchestrator.command_timeout_secs, 300);
    }
}
