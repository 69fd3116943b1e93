//! 디스커버리 이벤트 — 발견된 워크로드 인스턴스의 메타데이터 트리
//!
//! [`DiscoveryEvent`]는 컨테이너/파드 메타데이터와 선택적 힌트 어노테이션을 담는
//! 불변 트리입니다. 이벤트 소스(디스커버리 버스)가 생성하며, 생성기는 읽기만 합니다.
//!
//! # 사용 예시
//! ```
//! use loghint_core::event::DiscoveryEvent;
//! use serde_json::json;
//!
//! let event = DiscoveryEvent::from_value(json!({
//!     "host": "1.2.3.4",
//!     "container": {"id": "abc", "name": "web"},
//!     "hints": {"logs": {"include_lines": "^ERR"}}
//! }))?;
//!
//! assert_eq!(event.host(), Some("1.2.3.4"));
//! assert!(event.hints().is_some());
//! # Ok::<(), loghint_core::error::LoghintError>(())
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EventError, LoghintError};
use crate::value::{self, Mapping};

/// 식별 정보 필드명
pub const FIELD_HOST: &str = "host";

/// 힌트 서브트리 필드명
pub const FIELD_HINTS: &str = "hints";

/// 디스커버리 이벤트
///
/// 최상위는 항상 매핑입니다. `host` 필드가 없으면 아직 준비되지 않은
/// 워크로드로 간주되어 설정이 생성되지 않습니다.
///
/// 역직렬화도 [`DiscoveryEvent::from_value`]를 거치므로 매핑이 아닌 최상위 값은
/// 거부됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct DiscoveryEvent {
    data: Value,
}

impl Default for DiscoveryEvent {
    fn default() -> Self {
        Self::new(Mapping::new())
    }
}

impl TryFrom<Value> for DiscoveryEvent {
    type Error = LoghintError;

    fn try_from(data: Value) -> Result<Self, Self::Error> {
        Self::from_value(data)
    }
}

impl From<DiscoveryEvent> for Value {
    fn from(event: DiscoveryEvent) -> Self {
        event.data
    }
}

impl DiscoveryEvent {
    /// 매핑으로부터 이벤트를 생성합니다.
    pub fn new(data: Mapping) -> Self {
        Self {
            data: Value::Object(data),
        }
    }

    /// 임의의 값으로부터 이벤트를 생성합니다.
    ///
    /// # Errors
    /// 최상위 값이 매핑이 아니면 [`EventError::NotAMapping`]
    pub fn from_value(data: Value) -> Result<Self, LoghintError> {
        if !data.is_object() {
            return Err(EventError::NotAMapping {
                found: type_name(&data).to_owned(),
            }
            .into());
        }
        Ok(Self { data })
    }

    /// JSON 문자열에서 이벤트를 파싱합니다.
    pub fn from_json(json: &str) -> Result<Self, LoghintError> {
        let data: Value = serde_json::from_str(json).map_err(|e| EventError::Decode {
            reason: e.to_string(),
        })?;
        Self::from_value(data)
    }

    /// 이벤트의 호스트/주소 식별자
    ///
    /// 비어 있는 문자열은 식별자로 인정하지 않습니다.
    pub fn host(&self) -> Option<&str> {
        self.data
            .get(FIELD_HOST)
            .and_then(Value::as_str)
            .filter(|h| !h.trim().is_empty())
    }

    /// 최소 식별 정보를 갖추었는지 여부
    pub fn is_addressable(&self) -> bool {
        self.host().is_some()
    }

    /// `hints` 서브트리
    pub fn hints(&self) -> Option<&Mapping> {
        self.data.get(FIELD_HINTS).and_then(Value::as_object)
    }

    /// 점 경로로 값을 조회합니다.
    pub fn get(&self, path: &str) -> Option<&Value> {
        value::lookup(&self.data, path)
    }

    /// 플레이스홀더 `data` 네임스페이스로 사용되는 전체 트리
    pub fn data(&self) -> &Value {
        &self.data
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
