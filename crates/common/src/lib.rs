pub mod competency;
pub mod config;
pub mod dates;
pub mod entities;
pub mod error;
pub mod links;
pub mod models;
pub mod qr;
pub mod state;
pub mod store;
pub mod transaction;
pub mod validation;
pub mod verification;

// ============ 重新导出常用类型 ============

// 错误处理
pub use error::{CertError, Result};

// 配置相关
pub use config::{AdminCredentials, AppConfig};

// 实体
pub use entities::{RecordStatus, certificates, signers};

// 存储与缓存
pub use state::{ListViewCache, RecordKind};
pub use store::RecordStore;

// 链接与二维码
pub use links::VerificationLinks;
pub use qr::{QrImage, QrOptions};

// 验证相关
pub use validation::ValidationError;
pub use verification::{CertificateView, SignerView, Verification};
