//! 기대 서비스 계산 엔진
//!
//! (매니페스트, 활성 프로필 집합) → 기대 실행 서비스 집합을 계산하는 순수 함수입니다.
//! 오케스트레이터 상태, 시각, 호출 순서에 의존하지 않으므로 같은 입력은 항상
//! 같은 집합을 돌려줍니다.
//!
//! 어떤 서비스도 참조하지 않는 프로필은 아무것도 게이팅하지 않을 뿐 에러가 아닙니다.
//! 호출자가 이런 프로필을 보고하고 싶다면 [`unknown_profiles`]를 사용합니다.

use crate::manifest::Manifest;
use crate::types::{ProfileSet, ServiceSet};

/// 활성 프로필 집합에서 실행되어야 하는 서비스 이름 집합
///
/// 서비스의 태그 집합이 비어 있거나 활성 프로필과 교집합이 있으면 포함됩니다.
pub fn expected_services(manifest: &Manifest, active: &ProfileSet) -> ServiceSet {
    manifest
        .services()
        .filter(|service| service.is_activated_by(active))
        .map(|service| service.name())
        .collect()
}

/// 프로필과 무관하게 항상 실행되는 기본 서비스 집합
pub fn default_services(manifest: &Manifest) -> ServiceSet {
    manifest
        .services()
        .filter(|service| service.is_default())
        .map(|service| service.name())
        .collect()
}

/// 활성 프로필 중 매니페스트의 어떤 서비스도 참조하지 않는 프로필
pub fn unknown_profiles(manifest: &Manifest, active: &ProfileSet) -> ProfileSet {
    let known = manifest.all_profiles();
    active.difference(&known).cloned().collect()
}
