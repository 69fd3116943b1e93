//! 설정 관리 — loghint.toml 파싱 및 런타임 설정
//!
//! [`LoghintConfig`]는 로깅 설정과 힌트 생성기 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGHINT_HINTS_KEY=logs` 형식)
//! 3. 설정 파일 (`loghint.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), loghint_core::error::LoghintError> {
//! use loghint_core::config::LoghintConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LoghintConfig::load("loghint.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LoghintConfig::parse("[hints]\nkey = \"logs\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::error::{ConfigError, LoghintError};
use crate::value::{self, Mapping};

/// 여러 파서를 체인으로 갖는 입력 타입의 기본값
pub const DEFAULT_MULTI_PARSER_TYPE: &str = "filestream";

/// 기본 힌트 키 (수집 의도)
pub const DEFAULT_HINTS_KEY: &str = "logs";

/// loghint 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoghintConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 힌트 생성기 설정
    #[serde(default)]
    pub hints: HintsConfig,
}

impl LoghintConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LoghintError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LoghintError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoghintError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LoghintError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LoghintError> {
        toml::from_str(toml_str).map_err(|e| {
            LoghintError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGHINT_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "LOGHINT_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGHINT_GENERAL_LOG_FORMAT");

        override_string(&mut self.hints.key, "LOGHINT_HINTS_KEY");
        override_string(
            &mut self.hints.multi_parser_type,
            "LOGHINT_HINTS_MULTI_PARSER_TYPE",
        );
        override_string(&mut self.hints.modules_dir, "LOGHINT_HINTS_MODULES_DIR");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LoghintError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        self.hints.validate()
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 힌트 생성기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HintsConfig {
    /// 수집 의도 이름 (`hints.<key>` 서브트리를 읽음)
    pub key: String,
    /// multiline/json 힌트를 `parsers` 시퀀스로 보내는 입력 타입
    pub multi_parser_type: String,
    /// 모듈 정의 YAML 디렉토리
    pub modules_dir: String,
    /// 기본 입력 템플릿 (없으면 내장 filestream 템플릿)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_config: Option<Value>,
}

impl Default for HintsConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_HINTS_KEY.to_owned(),
            multi_parser_type: DEFAULT_MULTI_PARSER_TYPE.to_owned(),
            modules_dir: "/etc/loghint/modules.d".to_owned(),
            default_config: None,
        }
    }
}

impl HintsConfig {
    /// 기본 템플릿을 지정합니다.
    pub fn with_default_config(mut self, template: Value) -> Self {
        self.default_config = Some(template);
        self
    }

    /// 힌트 설정의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LoghintError> {
        if self.key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "hints.key".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.multi_parser_type.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "hints.multi_parser_type".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if let Some(template) = &self.default_config {
            if !template.is_object() {
                return Err(ConfigError::InvalidValue {
                    field: "hints.default_config".to_owned(),
                    reason: "must be a table".to_owned(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// 점 표기 키가 펼쳐진 기본 템플릿을 반환합니다.
    ///
    /// `type`을 선언한 템플릿은 그대로 사용하고, `type`이 없으면 내장 filestream
    /// 템플릿 위에 병합합니다 (예: `enabled = "false"`만 지정).
    pub fn template(&self) -> Mapping {
        match &self.default_config {
            Some(Value::Object(map)) if map.contains_key("type") => {
                value::expand_mapping(map.clone())
            }
            Some(Value::Object(map)) => {
                let mut template = builtin_template();
                value::deep_merge(&mut template, value::expand_mapping(map.clone()));
                template
            }
            _ => builtin_template(),
        }
    }
}

/// 내장 기본 템플릿 — 쿠버네티스 컨테이너 로그를 filestream으로 수집
pub fn builtin_template() -> Mapping {
    let template = json!({
        "type": "filestream",
        "id": "kubernetes-container-logs-${data.kubernetes.container.id}",
        "prospector": {
            "scanner": {
                "fingerprint.enabled": true,
                "symlinks": true
            }
        },
        "file_identity.fingerprint": null,
        "paths": [
            "/var/log/containers/*-${data.kubernetes.container.id}.log"
        ],
        "parsers": [
            {
                "container": {
                    "stream": "all",
                    "format": "auto"
                }
            }
        ]
    });
    match value::expand_dotted(template) {
        Value::Object(map) => map,
        _ => Mapping::new(),
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        if val.is_empty() {
            warn!(env_key, "empty env var, ignoring");
            return;
        }
        *target = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_is_valid() {
        let config = LoghintConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.hints.key, "logs");
        assert_eq!(config.hints.multi_parser_type, "filestream");
    }

    #[test]
    fn parse_partial_toml_keeps_defaults() {
        let config = LoghintConfig::parse("[general]\nlog_level = \"debug\"").unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.hints.key, "logs");
        assert!(config.hints.default_config.is_none());
    }

    #[test]
    fn parse_default_config_table() {
        let toml_str = r#"
[hints.default_config]
type = "docker"
close_timeout = "true"

[hints.default_config.containers]
ids = ["${data.container.id}"]
"#;
        let config = LoghintConfig::parse(toml_str).unwrap();
        let template = config.hints.template();
        assert_eq!(template["type"], "docker");
        assert_eq!(
            template["containers"]["ids"],
            serde_json::json!(["${data.container.id}"])
        );
    }

    #[test]
    fn template_expands_dotted_keys() {
        let toml_str = r#"
[hints.default_config]
type = "filestream"
"prospector.scanner.symlinks" = true
"#;
        let config = LoghintConfig::parse(toml_str).unwrap();
        let template = config.hints.template();
        assert_eq!(template["prospector"]["scanner"]["symlinks"], true);
    }

    #[test]
    fn typeless_template_overlays_builtin() {
        let config = HintsConfig::default().with_default_config(serde_json::json!({
            "enabled": "false"
        }));
        let template = config.template();
        assert_eq!(template["type"], "filestream");
        assert_eq!(template["enabled"], "false");
        assert_eq!(template["parsers"][0]["container"]["format"], "auto");
    }

    #[test]
    fn builtin_template_is_filestream() {
        let template = builtin_template();
        assert_eq!(template["type"], "filestream");
        assert_eq!(template["prospector"]["scanner"]["fingerprint"]["enabled"], true);
        assert!(template["file_identity"]["fingerprint"].is_null());
        assert_eq!(template["parsers"][0]["container"]["stream"], "all");
    }

    #[test]
    fn parse_invalid_toml_fails() {
        let err = LoghintConfig::parse("[hints\nkey = 1").unwrap_err();
        assert!(matches!(
            err,
            LoghintError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_unknown_log_level() {
        let mut config = LoghintConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("general.log_level"));
    }

    #[test]
    fn validate_rejects_unknown_log_format() {
        let mut config = LoghintConfig::default();
        config.general.log_format = "xml".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_key() {
        let mut config = LoghintConfig::default();
        config.hints.key = " ".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hints.key"));
    }

    #[test]
    fn validate_rejects_non_table_template() {
        let config = HintsConfig::default().with_default_config(Value::String("x".to_owned()));
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn env_override_replaces_key() {
        unsafe { std::env::set_var("LOGHINT_HINTS_KEY", "applogs") };
        let mut config = LoghintConfig::default();
        config.apply_env_overrides();
        unsafe { std::env::remove_var("LOGHINT_HINTS_KEY") };
        assert_eq!(config.hints.key, "applogs");
    }

    #[test]
    #[serial]
    fn env_override_ignores_empty_value() {
        unsafe { std::env::set_var("LOGHINT_GENERAL_LOG_LEVEL", "") };
        let mut config = LoghintConfig::default();
        config.apply_env_overrides();
        unsafe { std::env::remove_var("LOGHINT_GENERAL_LOG_LEVEL") };
        assert_eq!(config.general.log_level, "info");
    }

    #[tokio::test]
    async fn load_missing_file_reports_not_found() {
        let err = LoghintConfig::load("/nonexistent/loghint.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LoghintError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    #[serial]
    async fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loghint.toml");
        std::fs::write(&path, "[hints]\nkey = \"logs\"\nmodules_dir = \"/tmp/mods\"\n").unwrap();
        let config = LoghintConfig::load(&path).await.unwrap();
        assert_eq!(config.hints.modules_dir, "/tmp/mods");
    }
}
