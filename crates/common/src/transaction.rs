//! 事务处理辅助宏
//!
//! 提供简化的数据库事务处理接口，减少重复的样板代码。

/// 简化数据库事务处理的宏。
///
/// # 参数
///
/// * `$db` - 数据库连接引用
/// * `$txn` - 事务参数名称
/// * `$body` - 事务体，返回 `Result<T, CertError>`
///
/// # 示例
///
/// ```ignore
/// let (certificate, signer) = txn!(&db, |txn| {
///     insert_certificate_with_signer(txn, input, signer_name).await
/// })?;
/// ```
#[macro_export]
macro_rules! txn {
    ($db:expr, |$txn:ident| $body:expr) => {{
        use sea_orm::TransactionTrait;
        $db.transaction(|$txn| Box::pin(async move { $body })).await
    }};
}

/// 带参数克隆的事务宏。
///
/// 当事务闭包需要捕获外部变量时使用，自动克隆参数避免所有权问题。
///
/// # 示例
///
/// ```ignore
/// let linked = txn_with!(&db, |txn, signer_name| {
///     link_new_signer(txn, certificate_id, signer_name).await
/// }, signer_name.to_string())?;
/// ```
#[macro_export]
macro_rules! txn_with {
    ($db:expr, |$txn:ident, $($param:ident),*| $body:expr, $($arg:expr),*) => {{
        use sea_orm::TransactionTrait;
        $(let $param = $arg.clone();)*
        $db.transaction(|$txn| Box::pin(async move { $body })).await
    }};
}
