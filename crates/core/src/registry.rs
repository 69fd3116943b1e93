//! 모듈 레지스트리 trait — 모듈/파일셋 정의 조회 확장 포인트
//!
//! 생성기는 모듈 이름으로 파일셋 목록만 조회합니다. 정의를 어디서 읽어오는지
//! (내장 테이블, YAML 디렉토리 등)는 구현체의 몫입니다.

use serde::{Deserialize, Serialize};

use crate::value::Mapping;

/// 파일셋 템플릿
///
/// 모듈에 속한 파일셋 하나의 기본 입력 오버레이와 기본 활성화 여부입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilesetTemplate {
    /// 파일셋 이름 (예: access, error)
    pub name: String,
    /// 명시적 선택이 없을 때 활성화 여부
    #[serde(default = "default_enabled", rename = "enabled")]
    pub default_enabled: bool,
    /// 기본 입력 위에 병합되는 오버레이
    #[serde(default)]
    pub input: Mapping,
}

fn default_enabled() -> bool {
    true
}

impl FilesetTemplate {
    /// 오버레이 없이 기본 활성화된 파일셋을 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_enabled: true,
            input: Mapping::new(),
        }
    }

    /// 기본 활성화 여부를 설정합니다.
    pub fn with_default_enabled(mut self, enabled: bool) -> Self {
        self.default_enabled = enabled;
        self
    }

    /// 입력 오버레이를 설정합니다.
    pub fn with_input(mut self, input: Mapping) -> Self {
        self.input = input;
        self
    }
}

/// 모듈 레지스트리
///
/// 프로세스 수명 동안 불변이며 여러 생성 주기에서 동시에 읽힙니다.
pub trait ModuleRegistry: Send + Sync {
    /// 모듈의 파일셋 목록 (정의 순서 유지). 알 수 없는 모듈이면 `None`
    fn filesets(&self, module: &str) -> Option<&[FilesetTemplate]>;

    /// 등록된 모듈 이름 목록
    fn modules(&self) -> Vec<&str>;
}
