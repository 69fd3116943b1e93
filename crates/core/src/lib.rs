#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod registry;
pub mod value;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, EventError, LoghintError, RegistryError};

// 설정
pub use config::{GeneralConfig, HintsConfig, LoghintConfig};

// 이벤트
pub use event::DiscoveryEvent;

// 모듈 레지스트리 trait
pub use registry::{FilesetTemplate, ModuleRegistry};

// 값 트리
pub use value::Mapping;
