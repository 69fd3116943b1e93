//! 힌트 지시어 — 느슨한 힌트 트리를 정적 타입 지시어로 변환
//!
//! 힌트 셋 하나(`hints.logs` 서브트리 또는 번호가 붙은 그룹 하나)를 한 번만
//! 파싱하여 [`Directive`] 목록으로 만들고, 이를 [`HintSet`]으로 접습니다.
//! 인식하지 못한 키는 [`Directive::Passthrough`]로 남고, 병합 시 같은 이름의
//! 템플릿 필드가 있을 때만 그 필드를 덮어씁니다.
//!
//! # 인식하는 키
//!
//! | 키 | 지시어 |
//! |---|---|
//! | `raw` | [`Directive::Raw`] |
//! | `enabled` / `disable` | [`Directive::Enabled`] / [`Directive::Disable`] |
//! | `include_lines` / `exclude_lines` | 쉼표 구분 패턴 목록 |
//! | `multiline`, `multiline.*` | [`Directive::Multiline`] |
//! | `json`, `json.*`, `ndjson` | [`Directive::Json`] |
//! | `processors`, `processors.*` | [`Directive::Processors`] |
//! | `pipeline` | [`Directive::Pipeline`] |
//! | `module` | [`Directive::Module`] |
//! | `fileset`, `fileset.<stream>` | [`Directive::Fileset`] / [`Directive::FilesetStream`] |
//!
//! 불리언과 숫자 인덱스는 문자열(`"true"`, `"1"`)과 네이티브 값 모두 허용합니다.
//!
//! 빈 프로세서 정의(`drop_event: {}`)는 null이 아닌 빈 매핑 `{"drop_event": {}}`으로 출력됩니다.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use loghint_core::value::{self, Mapping};

/// 컨테이너 출력 스트림
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    /// stdout + stderr
    All,
    /// 표준 출력
    Stdout,
    /// 표준 에러
    Stderr,
}

impl Stream {
    /// 모든 스트림 (선택 우선순위 순서)
    pub const ALL: [Stream; 3] = [Stream::All, Stream::Stdout, Stream::Stderr];

    /// 설정에 기록되는 스트림 이름
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }

    /// 스트림 이름을 파싱합니다.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "all" => Some(Self::All),
            "stdout" => Some(Self::Stdout),
            "stderr" => Some(Self::Stderr),
            _ => None,
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 힌트 지시어
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// 완성된 입력 설정 목록 (JSON 문자열 또는 네이티브 값)
    Raw(Value),
    /// 명시적 활성화/비활성화
    Enabled(bool),
    /// 무조건 비활성화
    Disable(bool),
    /// 포함할 라인 패턴
    IncludeLines(Vec<String>),
    /// 제외할 라인 패턴
    ExcludeLines(Vec<String>),
    /// multiline 옵션 (부분 매핑 가능)
    Multiline(Mapping),
    /// json/ndjson 옵션 (부분 매핑 가능)
    Json(Mapping),
    /// 프로세서 정의 (매핑 또는 시퀀스)
    Processors(Value),
    /// 인제스트 파이프라인 이름
    Pipeline(String),
    /// 모듈 이름
    Module(String),
    /// 단일 파일셋 선택
    Fileset(String),
    /// 스트림별 파일셋 바인딩
    FilesetStream(Stream, String),
    /// 템플릿 필드 직접 덮어쓰기
    Passthrough(String, Value),
}

impl Directive {
    /// 힌트 키/값 하나를 지시어로 변환합니다.
    ///
    /// 해석할 수 없는 값(예: `enabled: "maybe"`)은 무시되어 빈 목록을 반환합니다.
    pub fn parse(key: &str, value: &Value) -> Vec<Directive> {
        let (head, rest) = match key.split_once('.') {
            Some((head, rest)) => (head, rest),
            None => (key, ""),
        };

        let parsed = match (head, rest) {
            ("raw", "") => Some(Directive::Raw(value.clone())),
            ("enabled", "") => value::parse_bool(value).map(Directive::Enabled),
            ("disable", "") => value::parse_bool(value).map(Directive::Disable),
            ("include_lines", "") => Some(Directive::IncludeLines(split_patterns(value))),
            ("exclude_lines", "") => Some(Directive::ExcludeLines(split_patterns(value))),
            ("multiline", rest) => nested_options(rest, value).map(Directive::Multiline),
            ("json" | "ndjson", rest) => nested_options(rest, value).map(Directive::Json),
            ("processors", "") => Some(Directive::Processors(value.clone())),
            ("processors", rest) => {
                let mut partial = Mapping::new();
                value::set_path(&mut partial, rest, value.clone());
                Some(Directive::Processors(Value::Object(partial)))
            }
            ("pipeline", "") => value::scalar_to_string(value).map(Directive::Pipeline),
            ("module", "") => value::scalar_to_string(value).map(Directive::Module),
            ("fileset", "") => return parse_fileset(value),
            ("fileset", stream) => match (Stream::parse(stream), value.as_str()) {
                (Some(stream), Some(name)) => {
                    Some(Directive::FilesetStream(stream, name.trim().to_owned()))
                }
                _ => None,
            },
            _ => Some(Directive::Passthrough(key.to_owned(), value.clone())),
        };

        if parsed.is_none() {
            debug!(key, "ignoring hint with unusable value");
        }
        parsed.into_iter().collect()
    }
}

/// 파일셋 선택
///
/// 단일 이름(`fileset`)과 스트림별 바인딩(`fileset.stdout` 등)을 함께 가질 수 있습니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilesetSelection {
    /// 모든 스트림을 받는 단일 파일셋
    pub single: Option<String>,
    /// 스트림 → 파일셋 바인딩
    pub streams: Vec<(Stream, String)>,
}

impl FilesetSelection {
    /// 명시적 선택이 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.single.is_none() && self.streams.is_empty()
    }

    fn bind(&mut self, stream: Stream, name: String) {
        self.streams.retain(|(s, _)| *s != stream);
        self.streams.push((stream, name));
    }
}

/// 파싱된 힌트 셋
///
/// 각 필드는 해당 지시어가 없으면 비어 있습니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HintSet {
    /// `raw` 지시어 원본 값
    pub raw: Option<Value>,
    /// `enabled` 지시어
    pub enabled: Option<bool>,
    /// `disable` 지시어
    pub disable: bool,
    /// 포함 라인 패턴
    pub include_lines: Vec<String>,
    /// 제외 라인 패턴
    pub exclude_lines: Vec<String>,
    /// multiline 옵션
    pub multiline: Option<Mapping>,
    /// json 옵션
    pub json: Option<Mapping>,
    /// 정규화된 프로세서 목록 (순서 보존)
    pub processors: Vec<Value>,
    /// 인제스트 파이프라인
    pub pipeline: Option<String>,
    /// 모듈 이름
    pub module: Option<String>,
    /// 파일셋 선택
    pub fileset: FilesetSelection,
    /// 직접 덮어쓸 템플릿 필드 (키 순서 유지)
    pub passthrough: Vec<(String, Value)>,
}

impl HintSet {
    /// 힌트 매핑을 파싱합니다.
    pub fn from_mapping(map: &Mapping) -> Self {
        let directives = map
            .iter()
            .flat_map(|(key, value)| Directive::parse(key, value))
            .collect::<Vec<_>>();
        Self::from_directives(directives)
    }

    /// 지시어 목록을 힌트 셋으로 접습니다.
    pub fn from_directives(directives: impl IntoIterator<Item = Directive>) -> Self {
        let mut set = HintSet::default();
        let mut processors: Option<Value> = None;

        for directive in directives {
            match directive {
                Directive::Raw(raw) => set.raw = Some(raw),
                Directive::Enabled(enabled) => set.enabled = Some(enabled),
                Directive::Disable(disable) => set.disable = disable,
                Directive::IncludeLines(lines) => set.include_lines.extend(lines),
                Directive::ExcludeLines(lines) => set.exclude_lines.extend(lines),
                Directive::Multiline(options) => merge_options(&mut set.multiline, options),
                Directive::Json(options) => merge_options(&mut set.json, options),
                Directive::Processors(incoming) => {
                    processors = Some(match (processors.take(), incoming) {
                        (Some(Value::Object(mut acc)), Value::Object(more)) => {
                            value::deep_merge(&mut acc, more);
                            Value::Object(acc)
                        }
                        (_, incoming) => incoming,
                    });
                }
                Directive::Pipeline(pipeline) => set.pipeline = Some(pipeline),
                Directive::Module(module) => set.module = Some(module),
                Directive::Fileset(name) => set.fileset.single = Some(name),
                Directive::FilesetStream(stream, name) => set.fileset.bind(stream, name),
                Directive::Passthrough(key, value) => set.passthrough.push((key, value)),
            }
        }

        if let Some(processors) = processors {
            set.processors = normalize_processors(&processors);
        }
        set
    }

    /// 이 힌트 셋이 비활성화되었는지 여부
    ///
    /// `disable: true`가 같은 셋의 `enabled: true`보다 우선합니다.
    pub fn is_disabled(&self) -> bool {
        self.disable || self.enabled == Some(false)
    }
}

/// 쉼표 구분 문자열 또는 시퀀스를 트림된 패턴 목록으로 변환합니다.
///
/// ```
/// use loghint_hints::directive::split_patterns;
/// use serde_json::json;
///
/// assert_eq!(split_patterns(&json!("^a, ^b")), vec!["^a", "^b"]);
/// ```
pub fn split_patterns(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(value::scalar_to_string)
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// 프로세서 힌트를 순서 있는 시퀀스로 정규화합니다.
///
/// 매핑이면 숫자 키(오름차순)가 먼저, 이름 키(사전순)가 뒤에 오며
/// 이름 키 `k`는 `{k: <정의>}` 항목이 됩니다. 문자열로 된 정의는 JSON으로 디코딩합니다.
pub fn normalize_processors(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.iter().map(decode_definition).collect(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(decoded @ (Value::Array(_) | Value::Object(_))) => normalize_processors(&decoded),
            _ => {
                debug!(value = s.as_str(), "processors hint is not JSON, ignoring");
                Vec::new()
            }
        },
        Value::Object(map) => {
            let mut numbered: Vec<(u64, &Value)> = Vec::new();
            let mut named: Vec<(&String, &Value)> = Vec::new();
            for (key, definition) in map {
                match key.parse::<u64>() {
                    Ok(index) => numbered.push((index, definition)),
                    Err(_) => named.push((key, definition)),
                }
            }
            numbered.sort_by_key(|(index, _)| *index);
            named.sort_by(|a, b| a.0.cmp(b.0));

            let mut processors = Vec::with_capacity(numbered.len() + named.len());
            for (index, definition) in numbered {
                match decode_definition(definition) {
                    entry @ Value::Object(_) => processors.push(entry),
                    _ => debug!(index, "numbered processor is not a mapping, ignoring"),
                }
            }
            for (name, definition) in named {
                let mut entry = Mapping::new();
                entry.insert(name.clone(), decode_definition(definition));
                processors.push(Value::Object(entry));
            }
            processors
        }
        _ => Vec::new(),
    }
}

fn decode_definition(definition: &Value) -> Value {
    match definition {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(decoded @ Value::Object(_)) => decoded,
            _ => definition.clone(),
        },
        other => other.clone(),
    }
}

fn nested_options(rest: &str, value: &Value) -> Option<Mapping> {
    if rest.is_empty() {
        return match value {
            Value::Object(map) => Some(value::expand_mapping(map.clone())),
            _ => None,
        };
    }
    let mut options = Mapping::new();
    value::set_path(&mut options, rest, value.clone());
    Some(options)
}

fn merge_options(slot: &mut Option<Mapping>, options: Mapping) {
    match slot {
        Some(existing) => value::deep_merge(existing, options),
        None => *slot = Some(options),
    }
}

fn parse_fileset(value: &Value) -> Vec<Directive> {
    match value {
        Value::String(name) if !name.trim().is_empty() => {
            vec![Directive::Fileset(name.trim().to_owned())]
        }
        Value::Object(bindings) => bindings
            .iter()
            .filter_map(|(stream, name)| {
                let stream = Stream::parse(stream)?;
                let name = name.as_str()?.trim();
                (!name.is_empty()).then(|| Directive::FilesetStream(stream, name.to_owned()))
            })
            .collect(),
        _ => {
            debug!("ignoring fileset hint with unusable value");
            Vec::new()
        }
    }
}
