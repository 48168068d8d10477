//! 에러 타입: 도메인별 에러 정의

/// composecheck 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum ComposeCheckError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 매니페스트 관련 에러
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

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

/// 매니페스트(compose 파일) 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// compose 파일을 찾을 수 없음
    #[error("compose file not found: {path}")]
    FileNotFound { path: String },

    /// compose 파일 파싱 실패
    #[error("failed to parse compose file: {reason}")]
    ParseFailed { reason: String },
}
