//! 메트릭 상수 및 설명 등록
//!
//! 힌트 생성기가 기록하는 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 생성기는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않았으면 기록은 무시됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `loghint_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(loghint_core::metrics::HINTS_CONFIGS_GENERATED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 드롭 사유 레이블 키 (disabled, unresolved, raw_decode, unknown_module, no_identity)
pub const LABEL_REASON: &str = "reason";

/// 생성 설정 종류 레이블 키 (input, module)
pub const LABEL_KIND: &str = "kind";

// ─── Hints 메트릭 ───────────────────────────────────────────────────

/// Hints: 처리된 디스커버리 이벤트 수 (counter)
pub const HINTS_EVENTS_PROCESSED_TOTAL: &str = "loghint_hints_events_processed_total";

/// Hints: 생성된 설정 수 (counter, label: kind)
pub const HINTS_CONFIGS_GENERATED_TOTAL: &str = "loghint_hints_configs_generated_total";

/// Hints: 드롭된 후보 설정 수 (counter, label: reason)
pub const HINTS_CANDIDATES_DROPPED_TOTAL: &str = "loghint_hints_candidates_dropped_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        HINTS_EVENTS_PROCESSED_TOTAL,
        "Total number of discovery events passed to the config generator"
    );
    describe_counter!(
        HINTS_CONFIGS_GENERATED_TOTAL,
        "Total number of input/module configs generated from hints"
    );
    describe_counter!(
        HINTS_CANDIDATES_DROPPED_TOTAL,
        "Candidate configs dropped (disabled, unresolved placeholder, bad raw hint, unknown module)"
    );
}
