#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

use loghint_core::config::builtin_template;
use loghint_core::event::DiscoveryEvent;
use loghint_core::registry::FilesetTemplate;
use loghint_hints::{ConfigGenerator, StaticModuleRegistry};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 힌트 키/값 목록 (최대 16개로 제한)
    hints: Vec<(FuzzKey, String)>,
    /// 인덱스 셋 번호 (None이면 최상위 키)
    index: Option<u8>,
}

#[derive(Arbitrary, Debug)]
enum FuzzKey {
    Module,
    Fileset,
    FilesetStdout,
    FilesetStderr,
    IncludeLines,
    ExcludeLines,
    MultilinePattern,
    JsonKeysUnderRoot,
    Processors,
    Raw,
    Enabled,
    Disable,
    Other(String),
}

impl FuzzKey {
    fn as_key(&self) -> String {
        match self {
            Self::Module => "module".to_owned(),
            Self::Fileset => "fileset".to_owned(),
            Self::FilesetStdout => "fileset.stdout".to_owned(),
            Self::FilesetStderr => "fileset.stderr".to_owned(),
            Self::IncludeLines => "include_lines".to_owned(),
            Self::ExcludeLines => "exclude_lines".to_owned(),
            Self::MultilinePattern => "multiline.pattern".to_owned(),
            Self::JsonKeysUnderRoot => "json.keys_under_root".to_owned(),
            Self::Processors => "processors".to_owned(),
            Self::Raw => "raw".to_owned(),
            Self::Enabled => "enabled".to_owned(),
            Self::Disable => "disable".to_owned(),
            Self::Other(key) => key.clone(),
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    let mut hints = Map::new();
    for (key, value) in input.hints.iter().take(16) {
        hints.insert(key.as_key(), Value::String(value.clone()));
    }

    let logs = match input.index {
        Some(index) => {
            let mut sets = Map::new();
            sets.insert(index.to_string(), Value::Object(hints));
            Value::Object(sets)
        }
        None => Value::Object(hints),
    };

    let mut data = Map::new();
    data.insert("host".to_owned(), Value::String("10.0.0.1".to_owned()));
    let mut kubernetes = Map::new();
    let mut container = Map::new();
    container.insert("id".to_owned(), Value::String("abc".to_owned()));
    kubernetes.insert("container".to_owned(), Value::Object(container));
    data.insert("kubernetes".to_owned(), Value::Object(kubernetes));
    let mut hint_root = Map::new();
    hint_root.insert("logs".to_owned(), logs);
    data.insert("hints".to_owned(), Value::Object(hint_root));

    let registry = StaticModuleRegistry::new().with_module(
        "apache",
        vec![FilesetTemplate::new("access"), FilesetTemplate::new("error")],
    );
    let generator = ConfigGenerator::new(builtin_template(), Arc::new(registry));
    let configs = generator.generate(&DiscoveryEvent::new(data));

    // 힌트 셋 하나는 raw 배열 전개를 제외하면 설정을 최대 하나 만든다
    if !input.hints.iter().any(|(key, _)| key.as_key().starts_with("raw")) {
        assert!(configs.len() <= 1);
    }
});
