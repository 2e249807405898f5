use std::fmt;

#[derive(Debug, Clone)]
pub enum SnaplinkError {
    Validation(String),
    NotFound(String),
    BadRequest(String),
    RouteUnmatched(String),
    StoreUnavailable(String),
    StoreOperation(String),
    IdSpaceExhausted(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    Serialization(String),
    Config(String),
}

impl SnaplinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SnaplinkError::Validation(_) => "E001",
            SnaplinkError::NotFound(_) => "E002",
            SnaplinkError::BadRequest(_) => "E003",
            SnaplinkError::RouteUnmatched(_) => "E004",
            SnaplinkError::StoreUnavailable(_) => "E005",
            SnaplinkError::StoreOperation(_) => "E006",
            SnaplinkError::IdSpaceExhausted(_) => "E007",
            SnaplinkError::DatabaseConfig(_) => "E008",
            SnaplinkError::DatabaseConnection(_) => "E009",
            SnaplinkError::Serialization(_) => "E010",
            SnaplinkError::Config(_) => "E011",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SnaplinkError::Validation(_) => "Validation Error",
            SnaplinkError::NotFound(_) => "Resource Not Found",
            SnaplinkError::BadRequest(_) => "Bad Request",
            SnaplinkError::RouteUnmatched(_) => "Route Unmatched",
            SnaplinkError::StoreUnavailable(_) => "Store Unavailable",
            SnaplinkError::StoreOperation(_) => "Store Operation Error",
            SnaplinkError::IdSpaceExhausted(_) => "Id Space Exhausted",
            SnaplinkError::DatabaseConfig(_) => "Database Configuration Error",
            SnaplinkError::DatabaseConnection(_) => "Database Connection Error",
            SnaplinkError::Serialization(_) => "Serialization Error",
            SnaplinkError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SnaplinkError::Validation(msg)
            | SnaplinkError::NotFound(msg)
            | SnaplinkError::BadRequest(msg)
            | SnaplinkError::RouteUnmatched(msg)
            | SnaplinkError::StoreUnavailable(msg)
            | SnaplinkError::StoreOperation(msg)
            | SnaplinkError::IdSpaceExhausted(msg)
            | SnaplinkError::DatabaseConfig(msg)
            | SnaplinkError::DatabaseConnection(msg)
            | SnaplinkError::Serialization(msg)
            | SnaplinkError::Config(msg) => msg,
        }
    }

    /// Whether the failure comes from the store rather than from the caller.
    ///
    /// These are the failures that surface as 503 at the HTTP boundary.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            SnaplinkError::StoreUnavailable(_)
                | SnaplinkError::StoreOperation(_)
                | SnaplinkError::IdSpaceExhausted(_)
                | SnaplinkError::DatabaseConnection(_)
        )
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            SnaplinkError::Validation(_) => StatusCode::PRECONDITION_FAILED,
            SnaplinkError::NotFound(_) => StatusCode::NOT_FOUND,
            SnaplinkError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ if self.is_store_failure() => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text returned to HTTP callers. Never carries the internal message.
    pub fn public_detail(&self) -> &'static str {
        match self {
            SnaplinkError::Validation(_) => "Link isn't valid or isn't live.",
            SnaplinkError::NotFound(_) => "Link not found.",
            SnaplinkError::BadRequest(_) => "Request body must contain a \"link\" string.",
            SnaplinkError::RouteUnmatched(_) => "Reached end.",
            _ if self.is_store_failure() => "Link store unavailable.",
            _ => "Internal error.",
        }
    }

    /// 格式化为彩色输出（用于终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SnaplinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SnaplinkError {}

// 便捷的构造函数
impl SnaplinkError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::NotFound(msg.into())
    }

    pub fn bad_request<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::BadRequest(msg.into())
    }

    pub fn route_unmatched<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::RouteUnmatched(msg.into())
    }

    pub fn store_unavailable<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::StoreUnavailable(msg.into())
    }

    pub fn store_operation<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::StoreOperation(msg.into())
    }

    pub fn id_space_exhausted<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::IdSpaceExhausted(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::DatabaseConnection(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Config(msg.into())
    }
}

impl From<sea_orm::DbErr> for SnaplinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        SnaplinkError::StoreOperation(err.to_string())
    }
}

impl From<std::io::Error> for SnaplinkError {
    fn from(err: std::io::Error) -> Self {
        SnaplinkError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SnaplinkError {
    fn from(err: serde_json::Error) -> Self {
        SnaplinkError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SnaplinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            SnaplinkError::validation("x"),
            SnaplinkError::not_found("x"),
            SnaplinkError::bad_request("x"),
            SnaplinkError::route_unmatched("x"),
            SnaplinkError::store_unavailable("x"),
            SnaplinkError::store_operation("x"),
            SnaplinkError::id_space_exhausted("x"),
            SnaplinkError::database_config("x"),
            SnaplinkError::database_connection("x"),
            SnaplinkError::serialization("x"),
            SnaplinkError::config("x"),
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_store_failure_classification() {
        assert!(SnaplinkError::store_unavailable("down").is_store_failure());
        assert!(SnaplinkError::id_space_exhausted("full").is_store_failure());
        assert!(!SnaplinkError::not_found("abc").is_store_failure());
        assert!(!SnaplinkError::validation("bad").is_store_failure());
    }

    #[test]
    fn test_http_mapping() {
        use actix_web::http::StatusCode;

        assert_eq!(
            SnaplinkError::validation("dead").http_status(),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            SnaplinkError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SnaplinkError::route_unmatched("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            SnaplinkError::store_operation("x").http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let leaky = SnaplinkError::store_unavailable("password=hunter2 at 10.0.0.5");
        assert_eq!(leaky.public_detail(), "Link store unavailable.");
        assert_eq!(
            SnaplinkError::route_unmatched("GET /x/y").public_detail(),
            "Reached end."
        );
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = SnaplinkError::not_found("Link 'abc123' does not exist");
        assert_eq!(
            err.to_string(),
            "Resource Not Found: Link 'abc123' does not exist"
        );
    }

    #[test]
    fn test_db_err_converts_to_store_operation() {
        let err: SnaplinkError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, SnaplinkError::StoreOperation(_)));
    }
}
