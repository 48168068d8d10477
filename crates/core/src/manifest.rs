//! 매니페스트 모델: 서비스와 서비스를 게이팅하는 프로필 선언
//!
//! [`Manifest`]는 어떤 서비스가 존재하고 어떤 프로필이 그 서비스를 게이팅하는지에
//! 대한 선언적 사실만 담습니다. 한 번 만들어지면 변경되지 않으며, 순회 외의
//! 연산은 제공하지 않습니다.
//!
//! compose 파일에서는 `services.<name>.profiles` 매핑만 읽습니다.
//! 이미지, 환경변수 치환 등 나머지 키는 오케스트레이터의 관심사이므로 무시합니다.
//!
//! # 사용 예시
//! ```
//! use composecheck_core::manifest::{Manifest, Service};
//!
//! let manifest = Manifest::from_services([
//!     Service::new("default-service"),
//!     Service::new("service-1").with_profile("profile-1"),
//! ]);
//! assert_eq!(manifest.len(), 2);
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ComposeCheckError, ManifestError};
use crate::types::ProfileSet;

/// 매니페스트에 선언된 서비스
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    name: String,
    profiles: ProfileSet,
}

impl Service {
    /// 프로필 태그가 없는 기본 서비스를 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profiles: ProfileSet::new(),
        }
    }

    /// 프로필 태그를 추가합니다.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profiles.insert(profile.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    /// 프로필 태그가 하나도 없으면 기본 서비스입니다.
    pub fn is_default(&self) -> bool {
        self.profiles.is_empty()
    }

    /// 활성 프로필 집합에서 이 서비스가 실행되어야 하는지 판단합니다.
    ///
    /// 태그가 없거나, 태그 중 하나라도 활성 프로필에 포함되면 `true`입니다.
    pub fn is_activated_by(&self, active: &ProfileSet) -> bool {
        self.is_default() || !self.profiles.is_disjoint(active)
    }
}

/// 서비스 선언 모음
///
/// 서비스 이름은 유일합니다. 같은 이름이 다시 주어지면 나중 선언이 앞선 선언을
/// 대체합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    services: BTreeMap<String, Service>,
}

impl Manifest {
    /// 서비스 목록에서 매니페스트를 생성합니다.
    pub fn from_services(services: impl IntoIterator<Item = Service>) -> Self {
        Self {
            services: services
                .into_iter()
                .map(|s| (s.name.clone(), s))
                .collect(),
        }
    }

    /// 선언된 모든 서비스를 이름 순으로 순회합니다.
    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    pub fn get(&self, name: &str) -> Option<&Service> {
        self.services.get(name)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// 매니페스트의 어느 서비스라도 참조하는 프로필 태그 전체
    ///
    /// 시나리오 종료 후 정리용 "down" 호출은 이 집합 전체를 활성화한 상태로
    /// 실행되어야 모든 게이팅 서비스가 제거됩니다.
    pub fn all_profiles(&self) -> ProfileSet {
        self.services
            .values()
            .flat_map(|s| s.profiles.iter().cloned())
            .collect()
    }

    /// compose YAML 문자열에서 프로필-서비스 매핑을 읽습니다.
    pub fn from_compose_yaml(yaml: &str) -> Result<Self, ComposeCheckError> {
        let parse_failed = |e: serde_yaml::Error| ManifestError::ParseFailed {
            reason: e.to_string(),
        };

        // `<<: *anchor` 병합 키로 상속된 profiles도 서비스에 펼쳐야 합니다.
        let mut value: serde_yaml::Value = serde_yaml::from_str(yaml).map_err(parse_failed)?;
        value.apply_merge().map_err(parse_failed)?;
        let document: ComposeDocument = serde_yaml::from_value(value).map_err(parse_failed)?;

        let services = document.services.into_iter().map(|(name, body)| {
            let profiles = body.map(|b| b.profiles).unwrap_or_default();
            Service {
                name,
                profiles: profiles.into_iter().collect(),
            }
        });

        Ok(Self::from_services(services))
    }

    /// compose 파일을 읽어 매니페스트를 생성합니다.
    pub async fn from_compose_file(path: impl AsRef<Path>) -> Result<Self, ComposeCheckError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ComposeCheckError::Manifest(ManifestError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                ComposeCheckError::Io(e)
            }
        })?;
        let manifest = Self::from_compose_yaml(&content)?;
        tracing::debug!(
            path = %path.display(),
            services = manifest.len(),
            "loaded compose manifest"
        );
        Ok(manifest)
    }
}

/// compose 파일 중 매니페스트 모델에 필요한 부분
#[derive(Deserialize)]
struct ComposeDocument {
    #[serde(default)]
    services: BTreeMap<String, Option<ComposeService>>,
}

#[derive(Deserialize)]
struct ComposeService {
    #[serde(default)]
    profiles: Vec<String>,
}
