use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 记录类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Certificate,
    Signer,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Certificate => "certificate",
            Self::Signer => "signer",
        }
    }
}

#[derive(Default)]
struct Slot {
    generation: u64,
    rendered: Option<Arc<str>>,
}

/// 管理列表渲染结果缓存；每次成功写入后按类型失效
///
/// 读取方先取 `generation`，查库渲染后带着该代号调用 `put`。
/// 期间若有写入使代号前进，渲染结果只返回给调用方，不进入缓存。
#[derive(Clone, Default)]
pub struct ListViewCache {
    inner: Arc<RwLock<HashMap<RecordKind, Slot>>>,
}

impl ListViewCache {
    pub async fn get(&self, kind: RecordKind) -> Option<Arc<str>> {
        self.inner
            .read()
            .await
            .get(&kind)
            .and_then(|slot| slot.rendered.clone())
    }

    pub async fn generation(&self, kind: RecordKind) -> u64 {
        self.inner
            .read()
            .await
            .get(&kind)
            .map_or(0, |slot| slot.generation)
    }

    pub async fn put(
        &self,
        kind: RecordKind,
        generation: u64,
        rendered: impl Into<Arc<str>>,
    ) -> Arc<str> {
        let rendered = rendered.into();
        let mut slots = self.inner.write().await;
        let slot = slots.entry(kind).or_default();
        if slot.generation == generation {
            slot.rendered = Some(rendered.clone());
        } else {
            tracing::debug!(kind = kind.as_str(), "stale list view discarded");
        }
        rendered
    }

    pub async fn invalidate(&self, kind: RecordKind) {
        let mut slots = self.inner.write().await;
        let slot = slots.entry(kind).or_default();
        slot.generation += 1;
        if slot.rendered.take().is_some() {
            tracing::debug!(kind = kind.as_str(), "list view invalidated");
        }
    }
}
