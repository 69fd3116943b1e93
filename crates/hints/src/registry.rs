//! 모듈 레지스트리 구현 — 메모리 테이블과 YAML 매니페스트 로더
//!
//! 매니페스트 파일 하나가 모듈 하나를 정의합니다.
//!
//! ```yaml
//! module: apache
//! filesets:
//!   - name: access
//!   - name: error
//!     enabled: true
//!     input:
//!       tags: ["apache-error"]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use loghint_core::registry::{FilesetTemplate, ModuleRegistry};

use crate::error::HintsError;

const MAX_MANIFEST_FILE_SIZE: u64 = 1024 * 1024; // 1MB
const MAX_MODULES_COUNT: usize = 1_000;

/// 메모리 기반 모듈 레지스트리 (등록 순서 유지)
#[derive(Debug, Clone, Default)]
pub struct StaticModuleRegistry {
    modules: Vec<(String, Vec<FilesetTemplate>)>,
}

impl StaticModuleRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 모듈을 추가한 레지스트리를 반환합니다.
    pub fn with_module(mut self, module: impl Into<String>, filesets: Vec<FilesetTemplate>) -> Self {
        self.insert(module, filesets);
        self
    }

    /// 모듈을 등록합니다. 같은 이름이 있으면 교체합니다.
    pub fn insert(&mut self, module: impl Into<String>, filesets: Vec<FilesetTemplate>) {
        let module = module.into();
        match self.modules.iter_mut().find(|(name, _)| *name == module) {
            Some((_, existing)) => *existing = filesets,
            None => self.modules.push((module, filesets)),
        }
    }

    /// 모듈 등록 여부
    pub fn contains(&self, module: &str) -> bool {
        self.modules.iter().any(|(name, _)| name == module)
    }

    /// 등록된 모듈 수
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleRegistry for StaticModuleRegistry {
    fn filesets(&self, module: &str) -> Option<&[FilesetTemplate]> {
        self.modules
            .iter()
            .find(|(name, _)| name == module)
            .map(|(_, filesets)| filesets.as_slice())
    }

    fn modules(&self) -> Vec<&str> {
        self.modules.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// 모듈 매니페스트 파일 구조
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// 모듈 이름
    pub module: String,
    /// 파일셋 목록 (정의 순서 유지)
    pub filesets: Vec<FilesetTemplate>,
}

impl ModuleManifest {
    /// 매니페스트 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), HintsError> {
        if self.module.trim().is_empty() {
            return Err(HintsError::ModuleValidation {
                module: self.module.clone(),
                reason: "module name must not be empty".to_owned(),
            });
        }
        if self.filesets.is_empty() {
            return Err(HintsError::ModuleValidation {
                module: self.module.clone(),
                reason: "module must define at least one fileset".to_owned(),
            });
        }

        let mut seen = HashSet::new();
        for fileset in &self.filesets {
            if fileset.name.trim().is_empty() {
                return Err(HintsError::ModuleValidation {
                    module: self.module.clone(),
                    reason: "fileset name must not be empty".to_owned(),
                });
            }
            if fileset.name == "module" {
                return Err(HintsError::ModuleValidation {
                    module: self.module.clone(),
                    reason: "'module' is reserved and cannot name a fileset".to_owned(),
                });
            }
            if !seen.insert(fileset.name.as_str()) {
                return Err(HintsError::ModuleValidation {
                    module: self.module.clone(),
                    reason: format!("duplicate fileset '{}'", fileset.name),
                });
            }
        }
        Ok(())
    }
}

/// 모듈 매니페스트 로더
pub struct ModuleLoader;

impl ModuleLoader {
    /// 디렉토리의 모든 YAML 매니페스트를 읽어 레지스트리를 만듭니다.
    ///
    /// 파일 이름 순으로 처리하며, 개별 파일 로딩 실패와 중복 모듈은
    /// 경고 로그를 남기고 건너뜁니다.
    ///
    /// # Errors
    /// - 디렉토리를 읽을 수 없는 경우
    /// - 모듈 수가 `MAX_MODULES_COUNT`를 초과하는 경우
    pub async fn load_directory(dir: impl AsRef<Path>) -> Result<StaticModuleRegistry, HintsError> {
        let dir = dir.as_ref();

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| HintsError::ModuleLoad {
                path: dir.display().to_string(),
                reason: format!("failed to read directory: {e}"),
            })?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| HintsError::ModuleLoad {
                path: dir.display().to_string(),
                reason: format!("failed to read directory entry: {e}"),
            })?
        {
            let path = entry.path();
            let is_yaml = path
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml");
            if is_yaml {
                paths.push(path);
            }
        }
        paths.sort();

        let mut registry = StaticModuleRegistry::new();
        for path in paths {
            match Self::load_file(&path).await {
                Ok(manifest) => {
                    if registry.contains(&manifest.module) {
                        tracing::warn!(
                            module = %manifest.module,
                            path = %path.display(),
                            "duplicate module, skipping"
                        );
                        continue;
                    }
                    registry.insert(manifest.module, manifest.filesets);
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to load module manifest, skipping"
                    );
                }
            }

            if registry.len() > MAX_MODULES_COUNT {
                return Err(HintsError::ModuleLoad {
                    path: dir.display().to_string(),
                    reason: format!("too many modules: max {MAX_MODULES_COUNT}"),
                });
            }
        }

        tracing::info!(
            dir = %dir.display(),
            count = registry.len(),
            "loaded module manifests"
        );

        Ok(registry)
    }

    /// 단일 매니페스트 파일을 읽습니다.
    pub async fn load_file(path: impl AsRef<Path>) -> Result<ModuleManifest, HintsError> {
        let path = path.as_ref();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| HintsError::ModuleLoad {
                path: path.display().to_string(),
                reason: format!("failed to read file metadata: {e}"),
            })?;

        if metadata.len() > MAX_MANIFEST_FILE_SIZE {
            return Err(HintsError::ModuleLoad {
                path: path.display().to_string(),
                reason: format!(
                    "file too large: {} bytes (max: {MAX_MANIFEST_FILE_SIZE})",
                    metadata.len()
                ),
            });
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| HintsError::ModuleLoad {
                path: path.display().to_string(),
                reason: format!("failed to read file: {e}"),
            })?;

        Self::parse_yaml(&content, &path.display().to_string())
    }

    /// YAML 문자열을 매니페스트로 파싱하고 검증합니다.
    pub fn parse_yaml(yaml_str: &str, source: &str) -> Result<ModuleManifest, HintsError> {
        let manifest: ModuleManifest =
            serde_yaml::from_str(yaml_str).map_err(|e| HintsError::ModuleLoad {
                path: source.to_owned(),
                reason: format!("YAML parse error: {e}"),
            })?;

        manifest.validate()?;

        Ok(manifest)
    }
}
