//! 에러 타입 — 도메인별 에러 정의

/// loghint 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LoghintError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 이벤트 관련 에러
    #[error("event error: {0}")]
    Event(#[from] EventError),

    /// 모듈 레지스트리 에러
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// 힌트 생성 에러
    #[error("hints error: {0}")]
    Hints(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 이벤트 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// 최상위 값이 매핑이 아님
    #[error("event must be a mapping, found {found}")]
    NotAMapping { found: String },

    /// 이벤트 디코딩 실패
    #[error("failed to decode event: {reason}")]
    Decode { reason: String },
}

/// 모듈 레지스트리 에러
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// 모듈 정의 로딩 실패
    #[error("failed to load module definition {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// 모듈 정의 검증 실패
    #[error("invalid module '{module}': {reason}")]
    InvalidModule { module: String, reason: String },
}
