//! 힌트 엔진 에러 타입
//!
//! [`HintsError`]는 플레이스홀더 해석, 힌트 디코딩, 모듈 정의 로딩 중 발생하는
//! 모든 에러를 표현합니다. `From<HintsError> for LoghintError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! 생성기 내부에서는 대부분의 에러가 후보 설정 하나를 드롭하는 데 그치며,
//! 호출자에게 전파되지 않습니다.

use loghint_core::error::{LoghintError, RegistryError};

/// 힌트 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum HintsError {
    /// 플레이스홀더 경로를 이벤트에서 찾을 수 없음
    #[error("unresolved placeholder '{token}'")]
    Unresolved {
        /// 원본 토큰 (예: `${data.container.id}`)
        token: String,
    },

    /// 해석할 수 없는 플레이스홀더 (지원하지 않는 네임스페이스, 비스칼라 보간 등)
    #[error("invalid placeholder '{token}': {reason}")]
    InvalidPlaceholder {
        /// 원본 토큰
        token: String,
        /// 실패 사유
        reason: String,
    },

    /// `raw` 힌트 디코딩 실패
    #[error("malformed raw hint: {reason}")]
    RawDecode {
        /// 실패 사유
        reason: String,
    },

    /// 모듈 정의 로딩 실패
    #[error("module load error: {path}: {reason}")]
    ModuleLoad {
        /// 정의 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 모듈 정의 검증 실패
    #[error("module validation error: module '{module}': {reason}")]
    ModuleValidation {
        /// 문제가 된 모듈 이름
        module: String,
        /// 검증 실패 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<HintsError> for LoghintError {
    fn from(err: HintsError) -> Self {
        match err {
            HintsError::ModuleLoad { path, reason } => {
                LoghintError::Registry(RegistryError::LoadFailed { path, reason })
            }
            HintsError::ModuleValidation { module, reason } => {
                LoghintError::Registry(RegistryError::InvalidModule { module, reason })
            }
            HintsError::Io(e) => LoghintError::Io(e),
            other => LoghintError::Hints(other.to_string()),
        }
    }
}
