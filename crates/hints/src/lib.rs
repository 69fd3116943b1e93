#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`placeholder`]: `${data.<path>}` 토큰 해석
//! - [`extractor`]: 이벤트에서 힌트 셋 추출 (단일/번호 그룹)
//! - [`directive`]: 힌트 키를 정적 타입 지시어로 파싱
//! - [`merger`]: 힌트 셋을 기본 템플릿 사본에 병합
//! - [`module`]: 모듈 힌트를 파일셋별 하위 설정으로 확장
//! - [`generator`]: 전체 생성 과정 오케스트레이션
//! - [`registry`]: 메모리/YAML 기반 모듈 레지스트리
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! DiscoveryEvent -> HintExtractor -> ConfigMerger -> ModuleExpander -> PlaceholderResolver
//!                        |               |                |                  |
//!                  hints.<key>     default template   ModuleRegistry     drop on failure
//! ```

pub mod directive;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod merger;
pub mod module;
pub mod placeholder;
pub mod registry;

// --- 주요 타입 re-export ---

// 생성기
pub use generator::{ConfigGenerator, GeneratedConfig};

// 에러
pub use error::HintsError;

// 구성 요소
pub use directive::{Directive, FilesetSelection, HintSet, Stream};
pub use extractor::{Extraction, HintExtractor, Suppression};
pub use merger::{Candidate, ConfigMerger, InputKind};
pub use module::ModuleExpander;
pub use placeholder::PlaceholderResolver;

// 레지스트리
pub use registry::{ModuleLoader, ModuleManifest, StaticModuleRegistry};
