//! 시나리오 정의 및 프로필 조합 생성
//!
//! 시나리오는 이름과 활성 프로필 집합의 쌍입니다. 설정 파일에 시나리오가 없으면
//! 매니페스트가 선언한 프로필 전체의 멱집합을 시나리오로 생성합니다.
//! 참조 fixture(프로필 2개)에서는 `{}`, `{profile-1}`, `{profile-2}`,
//! `{profile-1, profile-2}` 네 가지가 됩니다.

use composecheck_core::config::ScenarioConfig;
use composecheck_core::types::format_names;
use composecheck_core::{Manifest, ProfileSet, ServiceSet, expected_services};
use serde::Serialize;

use crate::error::LifecycleError;

/// 자동 생성할 수 있는 프로필 수 상한 (2^8 = 256 시나리오)
pub const MAX_MATRIX_PROFILES: usize = 8;

/// 검증 시나리오
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// 표시용 이름
    pub name: String,
    /// 활성화할 프로필
    pub profiles: ProfileSet,
}

impl Scenario {
    pub fn new(name: impl Into<String>, profiles: ProfileSet) -> Self {
        Self {
            name: name.into(),
            profiles,
        }
    }

    /// 프로필 집합에서 이름을 유도해 시나리오를 만듭니다.
    pub fn for_profiles(profiles: ProfileSet) -> Self {
        let name = if profiles.is_empty() {
            "no profiles".to_owned()
        } else {
            format!("profiles {}", format_names(&profiles))
        };
        Self { name, profiles }
    }
}

/// 프로필 집합의 멱집합을 시나리오 목록으로 만듭니다.
///
/// 빈 집합이 먼저 오고, 크기 순 → 사전 순으로 정렬됩니다.
///
/// # Errors
///
/// 프로필이 [`MAX_MATRIX_PROFILES`]개를 넘으면 `LifecycleError::Config`.
pub fn profile_matrix(profiles: &ProfileSet) -> Result<Vec<Scenario>, LifecycleError> {
    if profiles.len() > MAX_MATRIX_PROFILES {
        return Err(LifecycleError::Config {
            field: "scenarios".to_owned(),
            reason: format!(
                "manifest declares {} profiles; at most {MAX_MATRIX_PROFILES} can be combined \
                 automatically, declare [[scenarios]] explicitly",
                profiles.len()
            ),
        });
    }

    let universe: Vec<&String> = profiles.iter().collect();
    let mut subsets: Vec<ProfileSet> = (0..1usize << universe.len())
        .map(|mask| {
            universe
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, profile)| (*profile).clone())
                .collect()
        })
        .collect();
    subsets.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    Ok(subsets.into_iter().map(Scenario::for_profiles).collect())
}

/// 설정에 선언된 시나리오를 변환합니다.
///
/// `expected`가 선언된 시나리오는 기대 계산 결과와 비교하며, 다르면 오케스트레이터를
/// 호출하기 전에 설정 에러로 거부합니다.
pub fn scenarios_from_config(
    configs: &[ScenarioConfig],
    manifest: &Manifest,
) -> Result<Vec<Scenario>, LifecycleError> {
    configs
        .iter()
        .map(|config| {
            let profiles: ProfileSet = config.profiles.iter().cloned().collect();
            if let Some(declared) = &config.expected {
                let declared: ServiceSet = declared.iter().map(String::as_str).collect();
                let computed = expected_services(manifest, &profiles);
                if declared != computed {
                    return Err(LifecycleError::Config {
                        field: format!("scenarios.{}.expected", config.name),
                        reason: format!(
                            "declared {declared} but manifest activates {computed} for profiles {}",
                            format_names(&profiles)
                        ),
                    });
                }
            }
            Ok(Scenario::new(config.name.clone(), profiles))
        })
        .collect()
}

/// 실행할 시나리오 목록을 결정합니다.
///
/// 설정에 시나리오가 있으면 그대로, 없으면 프로필 조합을 생성합니다.
pub fn plan_scenarios(
    configs: &[ScenarioConfig],
    manifest: &Manifest,
) -> Result<Vec<Scenario>, LifecycleError> {
    if configs.is_empty() {
        profile_matrix(&manifest.all_profiles())
    } else {
        scenarios_from_config(configs, manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use composecheck_core::Service;

    fn profiles(names: &[&str]) -> ProfileSet {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    fn manifest() -> Manifest {
        Manifest::from_services([
            Service::new("default-service"),
            Service::new("service-1").with_profile("profile-1"),
            Service::new("service-2").with_profile("profile-2"),
        ])
    }

    #[test]
    fn matrix_for_two_profiles_matches_reference_scenarios() {
        let scenarios = profile_matrix(&profiles(&["profile-2", "profile-1"])).unwrap();
        let sets: Vec<ProfileSet> = scenarios.iter().map(|s| s.profiles.clone()).collect();
        assert_eq!(
            sets,
            vec![
                ProfileSet::new(),
                profiles(&["profile-1"]),
                profiles(&["profile-2"]),
                profiles(&["profile-1", "profile-2"]),
            ]
        );
        assert_eq!(scenarios[0].name, "no profiles");
        assert_eq!(scenarios[3].name, "profiles {profile-1, profile-2}");
    }

    #[test]
    fn matrix_of_empty_set_is_single_scenario() {
        let scenarios = profile_matrix(&ProfileSet::new()).unwrap();
        assert_eq!(scenarios.len(), 1);
        assert!(scenarios[0].profiles.is_empty());
    }

    #[test]
    fn matrix_size_is_power_of_two() {
        let names: Vec<String> = (0..MAX_MATRIX_PROFILES).map(|i| format!("p{i}")).collect();
        let set: ProfileSet = names.into_iter().collect();
        assert_eq!(profile_matrix(&set).unwrap().len(), 1 << MAX_MATRIX_PROFILES);
    }

    #[test]
    fn matrix_rejects_too_many_profiles() {
        let set: ProfileSet = (0..=MAX_MATRIX_PROFILES).map(|i| format!("p{i}")).collect();
        assert!(matches!(
            profile_matrix(&set),
            Err(LifecycleError::Config { .. })
        ));
    }

    #[test]
    fn config_scenarios_keep_names_and_order() {
        let configs = vec![
            ScenarioConfig {
                name: "second".to_owned(),
                profiles: vec!["profile-2".to_owned()],
                expected: None,
            },
            ScenarioConfig {
                name: "first".to_owned(),
                profiles: Vec::new(),
                expected: Some(vec!["default-service".to_owned()]),
            },
        ];
        let scenarios = scenarios_from_config(&configs, &manifest()).unwrap();
        assert_eq!(scenarios[0].name, "second");
        assert_eq!(scenarios[0].profiles, profiles(&["profile-2"]));
        assert_eq!(scenarios[1].name, "first");
    }

    #[test]
    fn config_expectation_disagreeing_with_manifest_is_rejected() {
        let configs = vec![ScenarioConfig {
            name: "wrong".to_owned(),
            profiles: vec!["profile-1".to_owned()],
            expected: Some(vec!["default-service".to_owned()]),
        }];
        match scenarios_from_config(&configs, &manifest()) {
            Err(LifecycleError::Config { field, reason }) => {
                assert_eq!(field, "scenarios.wrong.expected");
                assert!(reason.contains("{default-service, service-1}"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn plan_falls_back_to_matrix() {
        let scenarios = plan_scenarios(&[], &manifest()).unwrap();
        assert_eq!(scenarios.len(), 4);
    }
}
