//! 설정 생성기 — 추출, 병합, 모듈 확장, 플레이스홀더 해석을 한 번에 수행
//!
//! [`ConfigGenerator::generate`]는 이벤트 하나를 받아 순서가 보존된 설정 목록을
//! 돌려주는 순수 함수입니다. I/O가 없고 호출 사이에 상태를 갖지 않으므로
//! `Arc<ConfigGenerator>`를 여러 태스크에서 동시에 사용할 수 있습니다.
//!
//! 후보 단위 실패(해석 불가 토큰, 잘못된 `raw`, 알 수 없는 모듈)는 해당 후보만
//! 버리고 진단 로그와 메트릭을 남깁니다. 호출자에게 에러를 반환하지 않습니다.

use std::fmt;
use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use loghint_core::config::{DEFAULT_HINTS_KEY, DEFAULT_MULTI_PARSER_TYPE, HintsConfig};
use loghint_core::event::DiscoveryEvent;
use loghint_core::metrics as m;
use loghint_core::registry::ModuleRegistry;
use loghint_core::value::Mapping;

use crate::directive::HintSet;
use crate::error::HintsError;
use crate::extractor::{Extraction, HintExtractor};
use crate::merger::{Candidate, ConfigMerger};
use crate::module::ModuleExpander;
use crate::placeholder::PlaceholderResolver;

/// 생성된 설정
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeneratedConfig {
    /// 단일 입력 설정
    Input(Mapping),
    /// 모듈 설정 (`{module, <fileset>: {enabled, input}}`)
    Module(Mapping),
}

impl GeneratedConfig {
    /// 내부 매핑
    pub fn as_mapping(&self) -> &Mapping {
        match self {
            Self::Input(map) | Self::Module(map) => map,
        }
    }

    /// 내부 매핑을 꺼냅니다.
    pub fn into_mapping(self) -> Mapping {
        match self {
            Self::Input(map) | Self::Module(map) => map,
        }
    }

    /// 트리 값으로 변환합니다.
    pub fn into_value(self) -> Value {
        Value::Object(self.into_mapping())
    }

    /// 모듈 설정 여부
    pub fn is_module(&self) -> bool {
        matches!(self, Self::Module(_))
    }

    /// 메트릭 레이블 값
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::Module(_) => "module",
        }
    }

    fn resolve(self, resolver: &PlaceholderResolver<'_>) -> Result<Self, HintsError> {
        Ok(match self {
            Self::Input(map) => Self::Input(resolver.resolve_mapping(&map)?),
            Self::Module(map) => Self::Module(resolver.resolve_mapping(&map)?),
        })
    }
}

/// 힌트 기반 설정 생성기
pub struct ConfigGenerator {
    template: Mapping,
    extractor: HintExtractor,
    multi_parser_type: String,
    registry: Arc<dyn ModuleRegistry>,
}

impl ConfigGenerator {
    /// 기본 템플릿과 모듈 레지스트리로 생성기를 만듭니다.
    pub fn new(template: Mapping, registry: Arc<dyn ModuleRegistry>) -> Self {
        Self {
            template,
            extractor: HintExtractor::new(DEFAULT_HINTS_KEY),
            multi_parser_type: DEFAULT_MULTI_PARSER_TYPE.to_owned(),
            registry,
        }
    }

    /// 힌트 설정으로 생성기를 만듭니다.
    pub fn from_config(config: &HintsConfig, registry: Arc<dyn ModuleRegistry>) -> Self {
        Self::new(config.template(), registry)
            .with_key(config.key.clone())
            .with_multi_parser_type(config.multi_parser_type.clone())
    }

    /// 수집 의도 이름을 지정합니다.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.extractor = HintExtractor::new(key);
        self
    }

    /// 멀티 파서 입력 타입 이름을 지정합니다.
    pub fn with_multi_parser_type(mut self, multi_parser_type: impl Into<String>) -> Self {
        self.multi_parser_type = multi_parser_type.into();
        self
    }

    /// 기본 템플릿
    pub fn template(&self) -> &Mapping {
        &self.template
    }

    /// 모듈 레지스트리
    pub fn registry(&self) -> &dyn ModuleRegistry {
        self.registry.as_ref()
    }

    /// 이벤트 하나에 대한 설정 목록을 생성합니다.
    ///
    /// 출력 순서는 힌트 셋 순서(그리고 `raw` 배열 순서)를 따릅니다.
    pub fn generate(&self, event: &DiscoveryEvent) -> Vec<GeneratedConfig> {
        counter!(m::HINTS_EVENTS_PROCESSED_TOTAL).increment(1);

        let sets = match self.extractor.extract(event) {
            Extraction::Suppressed(reason) => {
                debug!(reason = reason.as_str(), "event suppressed");
                record_drop(reason.as_str());
                return Vec::new();
            }
            Extraction::Sets(sets) if sets.is_empty() => vec![HintSet::default()],
            Extraction::Sets(sets) => sets,
        };

        let merger = ConfigMerger::new(&self.template, &self.multi_parser_type);
        let expander = ModuleExpander::new(self.registry.as_ref());
        let resolver = PlaceholderResolver::new(event);

        let mut configs = Vec::new();
        for (index, set) in sets.iter().enumerate() {
            let candidates = match merger.merge(set) {
                Ok(Candidate::Suppressed) => {
                    debug!(index, "hint set disabled");
                    record_drop("disabled");
                    continue;
                }
                Ok(Candidate::Input(input)) => vec![GeneratedConfig::Input(input)],
                Ok(Candidate::Raw(inputs)) => {
                    inputs.into_iter().map(GeneratedConfig::Input).collect()
                }
                Ok(Candidate::Module {
                    module,
                    selection,
                    base,
                    kind,
                }) => match expander.expand(&module, &selection, &base, kind) {
                    Some(config) => vec![GeneratedConfig::Module(config)],
                    None => {
                        record_drop("unknown_module");
                        continue;
                    }
                },
                Err(e) => {
                    warn!(index, error = %e, "dropping hint set");
                    record_drop("raw_decode");
                    continue;
                }
            };

            for candidate in candidates {
                match candidate.resolve(&resolver) {
                    Ok(config) => {
                        counter!(m::HINTS_CONFIGS_GENERATED_TOTAL, m::LABEL_KIND => config.kind())
                            .increment(1);
                        configs.push(config);
                    }
                    Err(e) => {
                        debug!(index, error = %e, "dropping unresolved config");
                        record_drop("unresolved");
                    }
                }
            }
        }

        configs
    }
}

impl fmt::Debug for ConfigGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigGenerator")
            .field("key", &self.extractor.key())
            .field("multi_parser_type", &self.multi_parser_type)
            .field("template", &self.template)
            .field("modules", &self.registry.modules())
            .finish()
    }
}

fn record_drop(reason: &'static str) {
    counter!(m::HINTS_CANDIDATES_DROPPED_TOTAL, m::LABEL_REASON => reason).increment(1);
}
