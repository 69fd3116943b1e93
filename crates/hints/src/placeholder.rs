//! 플레이스홀더 치환 — `${data.<path>}` 토큰을 이벤트 값으로 대체
//!
//! 중첩 구조(문자열, 시퀀스, 매핑) 안의 모든 토큰을 이벤트 트리에서 찾은 값으로
//! 바꾼 사본을 만듭니다.
//!
//! - 문자열 전체가 토큰 하나면 값 전체(타입 포함)로 대체합니다.
//! - 더 긴 문자열에 포함된 토큰은 스칼라 값만 문자열로 보간합니다.
//! - `${data.<path>:<default>}` 형태는 경로가 없거나 null일 때 기본값을 사용합니다.
//! - `data` 이외의 네임스페이스, 찾을 수 없는 경로는 에러입니다. 호출자는 해당
//!   후보 설정 전체를 버려야 합니다.
//!
//! # 사용 예시
//! ```
//! use loghint_core::event::DiscoveryEvent;
//! use loghint_hints::placeholder::PlaceholderResolver;
//! use serde_json::json;
//!
//! let event = DiscoveryEvent::from_value(json!({"container": {"id": "abc"}}))?;
//! let resolver = PlaceholderResolver::new(&event);
//!
//! let resolved = resolver.resolve(&json!({"paths": ["/var/lib/docker/containers/${data.container.id}/*.log"]}))?;
//! assert_eq!(resolved, json!({"paths": ["/var/lib/docker/containers/abc/*.log"]}));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use loghint_core::event::DiscoveryEvent;
use loghint_core::value::{self, Mapping};

use crate::error::HintsError;

/// 플레이스홀더가 참조할 수 있는 유일한 네임스페이스
const DATA_NAMESPACE: &str = "data";

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^{}]*)\}").expect("placeholder pattern is valid"));

/// 값에 플레이스홀더 토큰이 하나라도 있는지 검사합니다.
pub fn contains_placeholder(value: &Value) -> bool {
    match value {
        Value::String(s) => TOKEN_RE.is_match(s),
        Value::Array(items) => items.iter().any(contains_placeholder),
        Value::Object(map) => map.values().any(contains_placeholder),
        _ => false,
    }
}

/// 이벤트 트리 기반 플레이스홀더 해석기
///
/// 이벤트를 빌려 쓰기만 하므로 생성 주기마다 가볍게 만들어 사용합니다.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderResolver<'a> {
    data: &'a Value,
}

impl<'a> PlaceholderResolver<'a> {
    /// 이벤트 전체를 `data` 네임스페이스로 사용하는 해석기를 만듭니다.
    pub fn new(event: &'a DiscoveryEvent) -> Self {
        Self { data: event.data() }
    }

    /// 임의의 트리를 `data` 네임스페이스로 사용하는 해석기를 만듭니다.
    pub fn with_data(data: &'a Value) -> Self {
        Self { data }
    }

    /// 구조를 재귀적으로 순회하며 모든 토큰을 치환한 사본을 반환합니다.
    ///
    /// # Errors
    /// 토큰 하나라도 해석에 실패하면 첫 번째 실패를 반환합니다.
    pub fn resolve(&self, value: &Value) -> Result<Value, HintsError> {
        match value {
            Value::String(s) => self.resolve_str(s),
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => self.resolve_mapping(map).map(Value::Object),
            scalar => Ok(scalar.clone()),
        }
    }

    /// 매핑 값들을 치환합니다. 키는 그대로 둡니다.
    pub fn resolve_mapping(&self, map: &Mapping) -> Result<Mapping, HintsError> {
        let mut out = Mapping::with_capacity(map.len());
        for (key, value) in map {
            out.insert(key.clone(), self.resolve(value)?);
        }
        Ok(out)
    }

    fn resolve_str(&self, s: &str) -> Result<Value, HintsError> {
        let mut matches = TOKEN_RE.captures_iter(s).peekable();
        if matches.peek().is_none() {
            return Ok(Value::String(s.to_owned()));
        }

        // 문자열 전체가 토큰 하나인 경우 타입까지 그대로 대체
        if let Some(whole) = TOKEN_RE.captures(s) {
            let full = whole.get(0).map(|m| m.range());
            if full == Some(0..s.len()) {
                return self.lookup_token(&whole[0], &whole[1]);
            }
        }

        let mut out = String::with_capacity(s.len());
        let mut last = 0;
        for caps in matches {
            let Some(token) = caps.get(0) else {
                continue;
            };
            out.push_str(&s[last..token.start()]);
            let resolved = self.lookup_token(token.as_str(), &caps[1])?;
            let text =
                value::scalar_to_string(&resolved).ok_or_else(|| HintsError::InvalidPlaceholder {
                    token: token.as_str().to_owned(),
                    reason: "cannot interpolate a non-scalar value into a string".to_owned(),
                })?;
            out.push_str(&text);
            last = token.end();
        }
        out.push_str(&s[last..]);
        Ok(Value::String(out))
    }

    fn lookup_token(&self, token: &str, expr: &str) -> Result<Value, HintsError> {
        let expr = expr.trim();
        let (reference, default) = match expr.split_once(':') {
            Some((reference, default)) => (reference.trim(), Some(default)),
            None => (expr, None),
        };

        let path = match reference.split_once('.') {
            Some((DATA_NAMESPACE, path)) if !path.is_empty() => path,
            _ => {
                return Err(HintsError::InvalidPlaceholder {
                    token: token.to_owned(),
                    reason: format!("only '{DATA_NAMESPACE}.<path>' references are supported"),
                });
            }
        };

        match value::lookup(self.data, path) {
            Some(found) if !found.is_null() => Ok(found.clone()),
            _ => match default {
                Some(default) => Ok(Value::String(default.to_owned())),
                None => Err(HintsError::Unresolved {
                    token: token.to_owned(),
                }),
            },
        }
    }
}
