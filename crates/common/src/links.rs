use uuid::Uuid;

/// 根据公开访问地址生成写入二维码的验证链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationLinks {
    base_url: String,
}

impl VerificationLinks {
    /// `base_url` 应已经过 `config::normalize_base_url` 处理
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn certificate(&self, id: Uuid) -> String {
        format!("{}/verify/certificate/{}", self.base_url, id)
    }

    pub fn signature(&self, id: Uuid) -> String {
        format!("{}/verify/signature/{}", self.base_url, id)
    }
}

/// 下载文件名：仅保留 `[A-Za-z0-9.-]`，其余字符替换为 `_`
pub fn download_filename(prefix: &str, label: &str) -> String {
    let sanitized: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{prefix}-{sanitized}.png")
}
