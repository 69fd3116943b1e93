//! 값 트리 — 이벤트, 템플릿, 힌트가 공유하는 키/값 구조 헬퍼
//!
//! 모든 트리는 `serde_json::Value`로 표현합니다 (`preserve_order` 활성화로
//! 매핑 키는 삽입 순서를 유지합니다). 이 모듈은 템플릿 병합에 필요한
//! 최소한의 연산만 제공합니다.
//!
//! - [`expand_dotted`]: `"a.b": 1` 형태의 점 표기 키를 중첩 매핑으로 펼침
//! - [`deep_merge`]: 매핑을 재귀적으로 병합 (충돌 시 overlay 우선)
//! - [`lookup`]: 점 경로로 값 조회 (리터럴 점 키 우선, 숫자 세그먼트는 시퀀스 인덱스)
//! - [`set_path`]: 점 경로에 값 기록 (중간 매핑 자동 생성)
//! - [`parse_bool`]: 문자열/숫자/불리언 플래그 정규화

use serde_json::Value;

/// 문자열 키 → 값 매핑
pub type Mapping = serde_json::Map<String, Value>;

/// 점 표기 키를 중첩 매핑으로 펼칩니다.
///
/// 시퀀스 내부의 매핑도 재귀적으로 처리합니다. 같은 접두어를 가진 키가
/// 여러 개면 [`deep_merge`]로 합쳐집니다.
///
/// ```
/// use loghint_core::value::expand_dotted;
/// use serde_json::json;
///
/// let expanded = expand_dotted(json!({"scanner": {"fingerprint.enabled": true, "symlinks": true}}));
/// assert_eq!(expanded, json!({"scanner": {"fingerprint": {"enabled": true}, "symlinks": true}}));
/// ```
pub fn expand_dotted(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(expand_mapping(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(expand_dotted).collect()),
        other => other,
    }
}

/// [`expand_dotted`]의 매핑 전용 버전
pub fn expand_mapping(map: Mapping) -> Mapping {
    let mut out = Mapping::new();
    for (key, value) in map {
        let value = expand_dotted(value);
        if key.contains('.') && !key.starts_with('.') && !key.ends_with('.') {
            let mut nested = value;
            for segment in key.rsplit('.') {
                let mut wrapper = Mapping::new();
                wrapper.insert(segment.to_owned(), nested);
                nested = Value::Object(wrapper);
            }
            if let Value::Object(nested) = nested {
                deep_merge(&mut out, nested);
            }
        } else {
            let mut single = Mapping::new();
            single.insert(key, value);
            deep_merge(&mut out, single);
        }
    }
    out
}

/// `overlay`를 `base`에 재귀적으로 병합합니다.
///
/// 양쪽이 모두 매핑인 키는 재귀 병합하고, 그 외 충돌은 overlay 값으로 덮어씁니다.
pub fn deep_merge(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, incoming) => {
                base.insert(key, incoming);
            }
        }
    }
}

/// 점 경로로 값을 조회합니다.
///
/// 각 단계에서 남은 세그먼트를 가장 긴 리터럴 키부터 시도하므로
/// `{"fileset.stdout": "access"}`와 `{"fileset": {"stdout": "access"}}`
/// 모두 `fileset.stdout`으로 조회됩니다.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    let segments: Vec<&str> = path.split('.').collect();
    lookup_segments(value, &segments)
}

fn lookup_segments<'a>(value: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    if segments.is_empty() {
        return Some(value);
    }
    match value {
        Value::Object(map) => {
            for take in (1..=segments.len()).rev() {
                let key = segments[..take].join(".");
                if let Some(child) = map.get(&key) {
                    if let Some(found) = lookup_segments(child, &segments[take..]) {
                        return Some(found);
                    }
                }
            }
            None
        }
        Value::Array(items) => {
            let index: usize = segments[0].parse().ok()?;
            lookup_segments(items.get(index)?, &segments[1..])
        }
        _ => None,
    }
}

/// 점 경로에 값을 기록합니다.
///
/// 중간 단계가 없거나 매핑이 아니면 빈 매핑으로 대체합니다.
pub fn set_path(map: &mut Mapping, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_owned(), value);
        }
        Some((head, rest)) => {
            let entry = map
                .entry(head.to_owned())
                .or_insert_with(|| Value::Object(Mapping::new()));
            if !entry.is_object() {
                *entry = Value::Object(Mapping::new());
            }
            if let Value::Object(child) = entry {
                set_path(child, rest, value);
            }
        }
    }
}

/// 불리언 플래그를 정규화합니다.
///
/// 힌트 어노테이션은 대부분 문자열로 도착하므로 `"true"`/`"false"` 등도 허용합니다.
/// 해석할 수 없는 값은 `None`입니다.
pub fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_u64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// 스칼라 값을 문자열로 변환합니다 (문자열, 숫자, 불리언만 해당).
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
