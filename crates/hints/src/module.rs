//! 모듈 확장기 — 모듈 힌트를 파일셋별 하위 설정으로 전개
//!
//! 모듈 하나에 대해 레지스트리가 아는 모든 파일셋을 정확히 한 번씩 출력합니다.
//!
//! ```text
//! {
//!   "module": "apache",
//!   "access": {"enabled": true,  "input": {...}},
//!   "error":  {"enabled": false, "input": {...}}
//! }
//! ```
//!
//! 활성화 판단 순서:
//! 1. `fileset` 단일 선택이 있으면 해당 파일셋만 활성화 (스트림 `all`)
//! 2. `fileset.<stream>` 바인딩이 있으면 이름이 지정된 파일셋을 해당 스트림으로 활성화
//! 3. 선택이 없거나 아는 파일셋과 하나도 맞지 않으면 레지스트리 기본값 사용

use serde_json::Value;
use tracing::{debug, warn};

use loghint_core::registry::{FilesetTemplate, ModuleRegistry};
use loghint_core::value::{self, Mapping};

use crate::directive::{FilesetSelection, Stream};
use crate::merger::{FIELD_PARSERS, InputKind};

/// 모듈 이름 필드
pub const FIELD_MODULE: &str = "module";

/// 파일셋 하나의 전개 계획
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilesetPlan {
    /// 활성화 여부
    pub enabled: bool,
    /// 입력에 기록될 스트림
    pub stream: Stream,
}

impl Default for FilesetPlan {
    fn default() -> Self {
        Self {
            enabled: false,
            stream: Stream::All,
        }
    }
}

/// 모듈 확장기
#[derive(Clone, Copy)]
pub struct ModuleExpander<'r> {
    registry: &'r dyn ModuleRegistry,
}

impl<'r> ModuleExpander<'r> {
    /// 레지스트리로 확장기를 만듭니다.
    pub fn new(registry: &'r dyn ModuleRegistry) -> Self {
        Self { registry }
    }

    /// 모듈 설정 하나를 만듭니다. 알 수 없는 모듈이면 `None`
    ///
    /// `kind`는 병합기가 템플릿 타입으로 정한 분류이며, 힌트가 `type`을
    /// 덮어써도 스트림 필드는 이 분류를 따라 기록됩니다.
    pub fn expand(
        &self,
        module: &str,
        selection: &FilesetSelection,
        base: &Mapping,
        kind: InputKind,
    ) -> Option<Mapping> {
        let Some(filesets) = self.registry.filesets(module) else {
            debug!(module, "unknown module, nothing to expand");
            return None;
        };

        let plans = plan_filesets(module, filesets, selection);

        let mut config = Mapping::new();
        config.insert(FIELD_MODULE.to_owned(), Value::String(module.to_owned()));
        for (fileset, plan) in filesets.iter().zip(plans) {
            let input = fileset_input(base, fileset, plan.stream, kind);
            let mut entry = Mapping::new();
            entry.insert("enabled".to_owned(), Value::Bool(plan.enabled));
            entry.insert("input".to_owned(), Value::Object(input));
            config.insert(fileset.name.clone(), Value::Object(entry));
        }
        Some(config)
    }

}

/// 기반 입력에 파일셋 오버레이를 병합하고 스트림을 기록합니다.
pub fn fileset_input(
    base: &Mapping,
    fileset: &FilesetTemplate,
    stream: Stream,
    kind: InputKind,
) -> Mapping {
    let mut input = base.clone();
    value::deep_merge(&mut input, value::expand_mapping(fileset.input.clone()));

    match kind {
        InputKind::MultiParser => set_parser_stream(&mut input, stream),
        InputKind::Stream => value::set_path(
            &mut input,
            "containers.stream",
            Value::String(stream.as_str().to_owned()),
        ),
    }
    input
}

/// 선택에 따라 파일셋별 활성화/스트림 계획을 계산합니다.
///
/// 반환 순서는 `filesets` 순서와 같습니다.
pub fn plan_filesets(
    module: &str,
    filesets: &[FilesetTemplate],
    selection: &FilesetSelection,
) -> Vec<FilesetPlan> {
    let mut plans = vec![FilesetPlan::default(); filesets.len()];
    let position = |name: &str| filesets.iter().position(|fs| fs.name == name);
    let mut configured = false;

    if let Some(name) = &selection.single {
        match position(name) {
            Some(index) => {
                plans[index].enabled = true;
                configured = true;
            }
            None => warn!(module, fileset = name.as_str(), "hinted fileset not found in module"),
        }
    }

    for stream in Stream::ALL {
        let bound = selection
            .streams
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, name)| name);
        for name in bound {
            match position(name) {
                Some(index) => {
                    plans[index] = FilesetPlan {
                        enabled: true,
                        stream,
                    };
                    configured = true;
                }
                None => warn!(
                    module,
                    fileset = name.as_str(),
                    stream = stream.as_str(),
                    "hinted fileset not found in module"
                ),
            }
        }
    }

    if !configured {
        if !selection.is_empty() {
            warn!(module, "fileset selection matched nothing, using module defaults");
        }
        for (plan, fileset) in plans.iter_mut().zip(filesets) {
            plan.enabled = fileset.default_enabled;
        }
    }

    plans
}

fn set_parser_stream(input: &mut Mapping, stream: Stream) {
    let stream = Value::String(stream.as_str().to_owned());
    if let Some(Value::Array(parsers)) = input.get_mut(FIELD_PARSERS) {
        let container = parsers
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find_map(|parser| parser.get_mut("container"));
        match container {
            Some(Value::Object(options)) => {
                options.insert("stream".to_owned(), stream);
                return;
            }
            Some(other) => {
                let mut options = Mapping::new();
                options.insert("stream".to_owned(), stream);
                *other = Value::Object(options);
                return;
            }
            None => {}
        }
    }

    let mut options = Mapping::new();
    options.insert("stream".to_owned(), stream);
    let mut parser = Mapping::new();
    parser.insert("container".to_owned(), Value::Object(options));

    match input.get_mut(FIELD_PARSERS) {
        Some(Value::Array(parsers)) => parsers.insert(0, Value::Object(parser)),
        _ => {
            input.insert(
                FIELD_PARSERS.to_owned(),
                Value::Array(vec![Value::Object(parser)]),
            );
        }
    }
}
