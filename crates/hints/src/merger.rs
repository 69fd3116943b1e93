//! 설정 병합기 — 힌트 셋 하나를 기본 템플릿 사본 위에 적용
//!
//! 템플릿은 읽기 전용 입력이며, 병합은 항상 깊은 복사본 위에서 이루어집니다.
//!
//! # 병합 규칙
//!
//! | 지시어 | 효과 |
//! |---|---|
//! | `raw` | 템플릿을 완전히 무시하고 디코딩된 설정 목록을 그대로 사용 |
//! | `enabled` / `disable` | 출력 여부 결정 (`disable`이 우선) |
//! | `include_lines` / `exclude_lines` | 템플릿의 기존 패턴 뒤에 추가 |
//! | `multiline` | 스트림형: `multiline`에 병합 / 멀티 파서형: `parsers`에 추가 |
//! | `json` | 스트림형: `json`에 병합 / 멀티 파서형: `ndjson` 파서로 추가 |
//! | `processors` | 템플릿 프로세서 뒤에 추가 |
//! | `pipeline` | `pipeline` 필드 설정 |
//! | `module` / `fileset` | 병합 결과를 기반 입력으로 모듈 확장 |
//! | 그 외 | 같은 이름의 템플릿 필드가 있을 때만 덮어씀, 없으면 무시 |
//!
//! 입력 타입 구분은 템플릿 자신의 `type`으로 결정합니다.

use serde_json::Value;
use tracing::debug;

use loghint_core::value::{self, Mapping};

use crate::directive::{FilesetSelection, HintSet};
use crate::error::HintsError;

/// 파서 시퀀스 필드명
pub const FIELD_PARSERS: &str = "parsers";
/// 프로세서 시퀀스 필드명
pub const FIELD_PROCESSORS: &str = "processors";
/// 활성화 플래그 필드명
pub const FIELD_ENABLED: &str = "enabled";

/// 입력 타입 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// 단일 multiline/json 필드를 갖는 입력 (docker, container, log 등)
    Stream,
    /// `parsers` 시퀀스를 갖는 입력 (filestream)
    MultiParser,
}

/// 힌트 셋 하나의 병합 결과 (플레이스홀더 미해석 상태)
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    /// 비활성화되어 출력 없음
    Suppressed,
    /// 단일 입력 설정
    Input(Mapping),
    /// 모듈 확장 대상
    Module {
        /// 모듈 이름
        module: String,
        /// 파일셋 선택
        selection: FilesetSelection,
        /// 나머지 지시어가 적용된 기반 입력
        base: Mapping,
        /// 템플릿 타입으로 정한 입력 분류 (스트림 필드 위치 결정)
        kind: InputKind,
    },
    /// `raw` 힌트로 주어진 설정 목록
    Raw(Vec<Mapping>),
}

/// 설정 병합기
#[derive(Debug, Clone, Copy)]
pub struct ConfigMerger<'t> {
    template: &'t Mapping,
    multi_parser_type: &'t str,
}

impl<'t> ConfigMerger<'t> {
    /// 기본 템플릿과 멀티 파서 타입 이름으로 병합기를 만듭니다.
    pub fn new(template: &'t Mapping, multi_parser_type: &'t str) -> Self {
        Self {
            template,
            multi_parser_type,
        }
    }

    /// 템플릿의 기본 활성화 여부 (`enabled`가 없으면 활성화)
    pub fn template_enabled(&self) -> bool {
        self.template
            .get(FIELD_ENABLED)
            .and_then(value::parse_bool)
            .unwrap_or(true)
    }

    /// 템플릿 타입에 따른 입력 분류
    pub fn input_kind(&self) -> InputKind {
        match self.template.get("type").and_then(Value::as_str) {
            Some(t) if t == self.multi_parser_type => InputKind::MultiParser,
            _ => InputKind::Stream,
        }
    }

    /// 힌트 셋 하나를 병합합니다.
    ///
    /// # Errors
    /// `raw` 힌트를 디코딩할 수 없으면 [`HintsError::RawDecode`]
    pub fn merge(&self, set: &HintSet) -> Result<Candidate, HintsError> {
        if set.is_disabled() {
            return Ok(Candidate::Suppressed);
        }

        if let Some(raw) = &set.raw {
            if set.module.is_some() {
                debug!("raw hint present, ignoring module hint in the same set");
            }
            return decode_raw(raw).map(Candidate::Raw);
        }

        if !set.enabled.unwrap_or_else(|| self.template_enabled()) {
            return Ok(Candidate::Suppressed);
        }

        let base = self.merge_input(set);
        Ok(match &set.module {
            Some(module) => Candidate::Module {
                module: module.clone(),
                selection: set.fileset.clone(),
                base,
                kind: self.input_kind(),
            },
            None => Candidate::Input(base),
        })
    }

    /// 템플릿 사본에 `raw`/모듈 이외의 지시어를 적용합니다.
    pub fn merge_input(&self, set: &HintSet) -> Mapping {
        let kind = self.input_kind();
        let mut config = self.template.clone();
        config.remove(FIELD_ENABLED);

        for (key, field) in &set.passthrough {
            let head = key.split('.').next().unwrap_or(key);
            if self.template.contains_key(head) {
                value::set_path(&mut config, key, field.clone());
            } else {
                debug!(key = key.as_str(), "hint does not match a template field, ignoring");
            }
        }

        append_sequence(
            &mut config,
            "include_lines",
            set.include_lines.iter().cloned().map(Value::String),
        );
        append_sequence(
            &mut config,
            "exclude_lines",
            set.exclude_lines.iter().cloned().map(Value::String),
        );

        if let Some(multiline) = &set.multiline {
            match kind {
                InputKind::MultiParser => append_parser(&mut config, "multiline", multiline),
                InputKind::Stream => merge_field(&mut config, "multiline", multiline),
            }
        }

        if let Some(json) = &set.json {
            match kind {
                InputKind::MultiParser => append_parser(&mut config, "ndjson", json),
                InputKind::Stream => merge_field(&mut config, "json", json),
            }
        }

        append_sequence(&mut config, FIELD_PROCESSORS, set.processors.iter().cloned());

        if let Some(pipeline) = &set.pipeline {
            config.insert("pipeline".to_owned(), Value::String(pipeline.clone()));
        }

        config
    }
}

/// `raw` 힌트를 설정 목록으로 디코딩합니다.
///
/// JSON 문자열(배열 또는 객체)과 네이티브 시퀀스/매핑을 허용합니다.
pub fn decode_raw(raw: &Value) -> Result<Vec<Mapping>, HintsError> {
    match raw {
        Value::String(s) => {
            let decoded: Value = serde_json::from_str(s).map_err(|e| HintsError::RawDecode {
                reason: e.to_string(),
            })?;
            if decoded.is_string() {
                return Err(HintsError::RawDecode {
                    reason: "expected an array or object, found a string".to_owned(),
                });
            }
            decode_raw(&decoded)
        }
        Value::Array(entries) => entries
            .iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                Value::Object(map) => Ok(value::expand_mapping(map.clone())),
                _ => Err(HintsError::RawDecode {
                    reason: format!("entry {index} is not an object"),
                }),
            })
            .collect(),
        Value::Object(map) => Ok(vec![value::expand_mapping(map.clone())]),
        _ => Err(HintsError::RawDecode {
            reason: "expected an array or object".to_owned(),
        }),
    }
}

fn append_sequence(config: &mut Mapping, key: &str, items: impl Iterator<Item = Value>) {
    let mut items = items.peekable();
    if items.peek().is_none() {
        return;
    }
    match config.get_mut(key) {
        Some(Value::Array(existing)) => existing.extend(items),
        _ => {
            config.insert(key.to_owned(), Value::Array(items.collect()));
        }
    }
}

fn append_parser(config: &mut Mapping, name: &str, options: &Mapping) {
    let mut parser = Mapping::new();
    parser.insert(name.to_owned(), Value::Object(options.clone()));
    append_sequence(config, FIELD_PARSERS, std::iter::once(Value::Object(parser)));
}

fn merge_field(config: &mut Mapping, key: &str, options: &Mapping) {
    match config.get_mut(key) {
        Some(Value::Object(existing)) => value::deep_merge(existing, options.clone()),
        _ => {
            config.insert(key.to_owned(), Value::Object(options.clone()));
        }
    }
}
