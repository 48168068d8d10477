//! 도메인 타입: 서비스 이름 집합과 프로필 집합
//!
//! 기대 집합(ExpectedSet)과 관측 집합(ObservedSet)은 모두 [`ServiceSet`]으로
//! 표현됩니다. 내부적으로 `BTreeSet`을 사용하므로 출력 순서가 항상 정렬되어
//! 에러 메시지와 리포트가 결정적입니다.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 활성화된 프로필 집합
///
/// 프로필은 동등 비교 외에 아무 구조도 없는 불투명 문자열입니다.
pub type ProfileSet = BTreeSet<String>;

/// 서비스 이름 집합
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceSet(BTreeSet<String>);

impl ServiceSet {
    /// 빈 집합을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 서비스 이름을 추가합니다. 이미 존재하면 `false`를 반환합니다.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// `self`에는 있고 `other`에는 없는 서비스 집합 (`self − other`)
    pub fn difference(&self, other: &ServiceSet) -> ServiceSet {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    /// `other`의 모든 원소가 `self`에 포함되는지 여부
    pub fn is_superset(&self, other: &ServiceSet) -> bool {
        self.0.is_superset(&other.0)
    }

    /// 줄 단위 텍스트에서 서비스 이름 집합을 만듭니다.
    ///
    /// 각 줄의 앞뒤 공백을 제거하고, 빈 줄은 건너뛰며, 중복은 하나로 합칩니다.
    pub fn from_lines(text: &str) -> Self {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ServiceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a ServiceSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ServiceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_names(&self.0))
    }
}

/// 이름 목록을 `{a, b}` 형식으로 렌더링합니다. 빈 목록은 `{}`입니다.
pub fn format_names<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    let joined = names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{joined}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_lines_skips_blank_lines_and_duplicates() {
        let set = ServiceSet::from_lines("web\n\nweb\n  db  \n\n");
        assert_eq!(set.len(), 2);
        assert!(set.contains("web"));
        assert!(set.contains("db"));
    }

    #[test]
    fn from_lines_empty_output_is_empty_set() {
        assert!(ServiceSet::from_lines("").is_empty());
        assert!(ServiceSet::from_lines("\n\n").is_empty());
    }

    #[test]
    fn from_lines_handles_crlf() {
        let set = ServiceSet::from_lines("a\r\nb\r\n");
        assert_eq!(set, ServiceSet::from_iter(["a", "b"]));
    }

    #[test]
    fn difference_is_directional() {
        let observed = ServiceSet::from_iter(["a", "b", "c"]);
        let expected = ServiceSet::from_iter(["b", "d"]);
        assert_eq!(
            observed.difference(&expected),
            ServiceSet::from_iter(["a", "c"])
        );
        assert_eq!(expected.difference(&observed), ServiceSet::from_iter(["d"]));
    }

    #[test]
    fn display_is_sorted() {
        let set = ServiceSet::from_iter(["service-2", "default-service", "service-1"]);
        assert_eq!(set.to_string(), "{default-service, service-1, service-2}");
    }

    #[test]
    fn display_empty_set() {
        assert_eq!(ServiceSet::new().to_string(), "{}");
    }

    #[test]
    fn serializes_as_plain_list() {
        let set = ServiceSet::from_iter(["b", "a"]);
        let yaml = serde_yaml::to_string(&set).unwrap();
        let back: Vec<String> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, vec!["a".to_owned(), "b".to_owned()]);
    }
}
