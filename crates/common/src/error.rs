//! 统一错误类型定义
//!
//! 全项目共享一个错误类型，简化错误传播和处理。

use thiserror::Error;

/// 统一错误类型
#[derive(Error, Debug)]
pub enum CertError {
    /// 资源未找到 (404)
    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 请求参数错误 (400)
    #[error("请求参数错误: {0}")]
    BadRequest(String),

    /// 输入验证错误 (400)
    #[error("输入验证失败: {0}")]
    Validation(String),

    /// 唯一性冲突 (409)
    #[error("数据冲突: {0}")]
    Conflict(String),

    /// 未认证 (401)
    #[error("未认证: {0}")]
    Unauthorized(String),

    /// 数据库错误 (500)
    #[error("数据库错误: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// 二维码编码错误 (500)
    #[error("二维码编码错误: {0}")]
    Qr(String),

    /// 图像编码错误 (500)
    #[error("图像编码错误: {0}")]
    Image(#[from] image::ImageError),

    /// IO 错误 (500)
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误 (500)
    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 其他内部错误 (500)
    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CertError {
    /// 创建未找到错误
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// 创建验证错误
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// 创建冲突错误
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// 创建二维码错误
    pub fn qr(msg: impl Into<String>) -> Self {
        Self::Qr(msg.into())
    }

    /// 判断是否为客户端错误（4xx）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::BadRequest(_)
                | Self::Validation(_)
                | Self::Conflict(_)
                | Self::Unauthorized(_)
        )
    }

    /// 判断是否为服务端错误（5xx）
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// 获取 HTTP 状态码
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::BadRequest(_) | Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Unauthorized(_) => 401,
            _ => 500,
        }
    }

    /// 获取 HTTP 状态码（axum 类型）
    #[cfg(feature = "server")]
    pub fn axum_status_code(&self) -> axum::http::StatusCode {
        axum::http::StatusCode::from_u16(self.http_status_code())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, CertError>;

// ============ Axum HTTP 响应支持 ============

#[cfg(feature = "server")]
mod axum_impl {
    use super::*;
    use axum::{
        Json,
        response::{IntoResponse, Response},
    };
    use serde_json::json;

    /// 为 CertError 实现 Axum IntoResponse trait，JSON API 处理函数可直接返回该错误
    impl IntoResponse for CertError {
        fn into_response(self) -> Response {
            let status = self.axum_status_code();

            // 根据错误类型和严重程度记录结构化日志
            match &self {
                // 客户端错误（4xx）- info 级别，通常是正常的业务流程
                CertError::NotFound(resource) => {
                    tracing::info!(
                        status = status.as_u16(),
                        resource = %resource,
                        "Resource not found"
                    );
                }
                CertError::BadRequest(msg) => {
                    tracing::info!(status = status.as_u16(), reason = %msg, "Bad request");
                }
                CertError::Validation(msg) => {
                    tracing::info!(
                        status = status.as_u16(),
                        validation_error = %msg,
                        "Request validation failed"
                    );
                }
                CertError::Conflict(msg) => {
                    tracing::info!(
                        status = status.as_u16(),
                        conflict = %msg,
                        "Uniqueness constraint rejected write"
                    );
                }
                CertError::Unauthorized(msg) => {
                    tracing::info!(status = status.as_u16(), reason = %msg, "Unauthorized");
                }
                // 数据库错误 - error 级别，需要关注
                CertError::Database(db_err) => {
                    tracing::error!(
                        status = status.as_u16(),
                        error = %db_err,
                        "Database operation failed"
                    );
                }
                CertError::Qr(msg) => {
                    tracing::error!(status = status.as_u16(), qr_error = %msg, "QR encoding failed");
                }
                CertError::Image(img_err) => {
                    tracing::error!(
                        status = status.as_u16(),
                        image_error = %img_err,
                        "Image encoding failed"
                    );
                }
                CertError::Io(io_err) => {
                    tracing::error!(
                        status = status.as_u16(),
                        io_error = %io_err,
                        "IO operation failed"
                    );
                }
                CertError::Serialization(json_err) => {
                    tracing::error!(
                        status = status.as_u16(),
                        serialization_error = %json_err,
                        "JSON serialization failed"
                    );
                }
                CertError::Internal(internal_err) => {
                    tracing::error!(
                        status = status.as_u16(),
                        internal_error = ?internal_err,
                        "Internal server error"
                    );
                }
            }

            // 服务端错误不向调用方暴露内部细节
            let message = if self.is_server_error() {
                "internal server error".to_string()
            } else {
                self.to_string()
            };
            let body = Json(json!({"error": message}));
            (status, body).into_response()
        }
    }
}

// ============ 事务错误支持 ============

/// SeaORM 事务错误转换
impl<T> From<sea_orm::TransactionError<T>> for CertError
where
    T: Into<CertError>,
{
    fn from(err: sea_orm::TransactionError<T>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(db) => Self::Database(db),
            sea_orm::TransactionError::Transaction(app) => app.into(),
        }
    }
}

/// 将写入失败映射为业务错误：唯一约束冲突为 409，外键失效为 400
pub fn map_write_error(err: sea_orm::DbErr) -> CertError {
    match err.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
            CertError::Conflict(format!("duplicate value: {detail}"))
        }
        Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(detail)) => {
            CertError::Validation(format!("referenced record missing: {detail}"))
        }
        _ => CertError::Database(err),
    }
}
