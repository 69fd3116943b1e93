//! 힌트 추출기 — 이벤트에서 수집 의도별 힌트 셋 목록을 만듭니다.
//!
//! `hints.<key>` 서브트리를 찾아 다음 규칙으로 힌트 셋을 나눕니다.
//!
//! - 모든 자식 키가 작은 정수 문자열이고 값이 매핑이면, 각 자식이 독립된 힌트 셋입니다
//!   (숫자 오름차순).
//! - 그 외에는 서브트리 전체가 힌트 셋 하나입니다.
//! - 서브트리가 없거나 비어 있으면 힌트 셋 목록이 비어 있습니다. 생성기는 이 경우
//!   기본 템플릿만으로 설정 하나를 만듭니다.
//!
//! 식별 정보(`host`)가 없거나 서브트리 최상위에 `disable: true`가 있으면
//! 이벤트 전체가 억제됩니다.

use serde_json::Value;

use loghint_core::event::DiscoveryEvent;
use loghint_core::value::{self, Mapping};

use crate::directive::HintSet;

/// 이벤트가 억제된 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// 최소 식별 정보가 없음 (디스커버리 초기의 정상적인 상태)
    MissingIdentity,
    /// 힌트로 비활성화됨
    Disabled,
}

impl Suppression {
    /// 메트릭 레이블 값
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingIdentity => "no_identity",
            Self::Disabled => "disabled",
        }
    }
}

/// 추출 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// 이벤트 전체 억제
    Suppressed(Suppression),
    /// 순서가 보존된 힌트 셋 목록 (비어 있을 수 있음)
    Sets(Vec<HintSet>),
}

/// 힌트 추출기
#[derive(Debug, Clone)]
pub struct HintExtractor {
    /// 수집 의도 이름 (예: logs)
    key: String,
}

impl HintExtractor {
    /// 수집 의도 이름으로 추출기를 만듭니다.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// 수집 의도 이름
    pub fn key(&self) -> &str {
        &self.key
    }

    /// 이벤트에서 힌트 셋을 추출합니다.
    pub fn extract(&self, event: &DiscoveryEvent) -> Extraction {
        if !event.is_addressable() {
            return Extraction::Suppressed(Suppression::MissingIdentity);
        }

        let Some(tree) = self.intent_tree(event) else {
            return Extraction::Sets(Vec::new());
        };

        if is_disabled(tree) {
            return Extraction::Suppressed(Suppression::Disabled);
        }

        Extraction::Sets(
            split_sets(tree)
                .into_iter()
                .map(HintSet::from_mapping)
                .collect(),
        )
    }

    /// `hints.<key>` 서브트리 (매핑인 경우만)
    pub fn intent_tree<'e>(&self, event: &'e DiscoveryEvent) -> Option<&'e Mapping> {
        event.hints()?.get(&self.key).and_then(Value::as_object)
    }
}

/// 힌트 서브트리를 힌트 셋 목록으로 나눕니다.
///
/// 번호 그룹이면 숫자 오름차순, 아니면 서브트리 전체 하나를 반환합니다.
pub fn split_sets(tree: &Mapping) -> Vec<&Mapping> {
    if tree.is_empty() {
        return Vec::new();
    }

    let indexed: Option<Vec<(u32, &Mapping)>> = tree
        .iter()
        .map(|(key, value)| Some((key.parse::<u32>().ok()?, value.as_object()?)))
        .collect();

    match indexed {
        Some(mut groups) => {
            groups.sort_by_key(|(index, _)| *index);
            groups.into_iter().map(|(_, group)| group).collect()
        }
        None => vec![tree],
    }
}

fn is_disabled(tree: &Mapping) -> bool {
    let disabled = tree.get("disable").and_then(value::parse_bool) == Some(true);
    let not_enabled = tree.get("enabled").and_then(value::parse_bool) == Some(false);
    disabled || not_enabled
}
