//! composecheck 공통 크레이트
//!
//! compose 오케스트레이터의 up/down 수명주기를 검증할 때 필요한 순수 로직을 담습니다.
//!
//! - [`manifest`]: 서비스와 프로필 게이트 선언 (`Manifest`, `Service`)
//! - [`expectation`]: (매니페스트, 활성 프로필) → 기대 서비스 집합
//! - [`types`]: `ServiceSet`, `ProfileSet`
//! - [`config`]: `composecheck.toml` 설정
//! - [`error`]: 에러 타입
//! - [`metrics`]: 메트릭 이름 상수

pub mod config;
pub mod error;
pub mod expectation;
pub mod manifest;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ComposeCheckError, ConfigError, ManifestError};

// 설정
pub use config::ComposeCheckConfig;

// 매니페스트 / 기대 계산
pub use expectation::{default_services, expected_services, unknown_profiles};
pub use manifest::{Manifest, Service};

// 도메인 타입
pub use types::{ProfileSet, ServiceSet};
