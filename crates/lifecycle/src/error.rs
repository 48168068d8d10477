//! 수명주기 검증 에러 타입
//!
//! [`LifecycleError`]의 앞 네 변형은 시나리오 결과를 나타냅니다.
//! 모두 해당 시나리오의 검증을 즉시 중단시키지만 정리(cleanup) 단계는 건너뛰지 않습니다.
//! 나머지 변형은 명령 실행 계층과 설정 검증에서 발생합니다.

use composecheck_core::ServiceSet;

use crate::compose::ComposeOperation;

/// 수명주기 검증 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// up/down 호출이 0이 아닌 종료 코드로 끝났거나 실행되지 못함
    #[error("orchestrator '{operation}' failed: {reason}")]
    OrchestratorFailure {
        /// 실패한 동작
        operation: ComposeOperation,
        /// 실패 사유 (종료 코드, stderr 요약)
        reason: String,
    },

    /// 실행 상태 조회가 0이 아닌 종료 코드로 끝났거나 실행되지 못함
    #[error("state query failed: {reason}")]
    StateQueryFailure {
        /// 실패 사유
        reason: String,
    },

    /// up 이후 관측된 서비스가 기대와 다름
    #[error(
        "running services do not match expectation: extra services were started: {extra}; \
         expected services were not started: {missing}"
    )]
    ExpectationMismatch {
        /// 관측됐지만 기대하지 않은 서비스
        extra: ServiceSet,
        /// 기대했지만 관측되지 않은 서비스
        missing: ServiceSet,
    },

    /// down 이후에도 서비스가 남아 있음
    #[error("failed to stop services: {leftover}")]
    TeardownIncomplete {
        /// 남아 있는 서비스
        leftover: ServiceSet,
    },

    /// 외부 프로세스 실행 실패
    #[error("failed to spawn '{program}': {reason}")]
    CommandSpawn {
        /// 실행하려던 프로그램
        program: String,
        /// 실패 사유
        reason: String,
    },

    /// 외부 프로세스가 제한 시간 안에 끝나지 않음
    #[error("command '{program}' timed out after {timeout_secs}s")]
    CommandTimeout {
        /// 실행한 프로그램
        program: String,
        /// 적용된 타임아웃 (초)
        timeout_secs: u64,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl LifecycleError {
    /// 리포트에 표시할 에러 종류 이름
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OrchestratorFailure { .. } => "orchestrator_failure",
            Self::StateQueryFailure { .. } => "state_query_failure",
            Self::ExpectationMismatch { .. } => "expectation_mismatch",
            Self::TeardownIncomplete { .. } => "teardown_incomplete",
            Self::CommandSpawn { .. } => "command_spawn",
            Self::CommandTimeout { .. } => "command_timeout",
            Self::Config { .. } => "config",
        }
    }
}
