//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않은 경우 카운터 호출은 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `composecheck_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (pass, fail)
pub const LABEL_RESULT: &str = "result";

/// 오케스트레이터 동작 레이블 키 (up, down, ps, cleanup)
pub const LABEL_OPERATION: &str = "operation";

// ─── 메트릭 이름 ───────────────────────────────────────────────────

/// 실행된 시나리오 수 (counter, label: result)
pub const SCENARIOS_TOTAL: &str = "composecheck_scenarios_total";

/// 외부 명령 호출 수 (counter, label: operation)
pub const COMMANDS_TOTAL: &str = "composecheck_commands_total";

/// 실패한 정리(cleanup) 호출 수 (counter)
pub const CLEANUP_FAILURES_TOTAL: &str = "composecheck_cleanup_failures_total";

/// 시나리오 하나의 소요 시간 (histogram, 초)
pub const SCENARIO_DURATION_SECONDS: &str = "composecheck_scenario_duration_seconds";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 프로세스 시작 시 한 번 호출합니다. 레코더가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        SCENARIOS_TOTAL,
        "Lifecycle scenarios executed, labelled by pass/fail"
    );
    describe_counter!(
        COMMANDS_TOTAL,
        "External orchestrator and runtime invocations by operation"
    );
    describe_counter!(
        CLEANUP_FAILURES_TOTAL,
        "Best-effort teardown invocations that did not succeed"
    );
    describe_histogram!(
        SCENARIO_DURATION_SECONDS,
        "Wall-clock duration of one up/verify/down/verify/cleanup scenario"
    );
}
