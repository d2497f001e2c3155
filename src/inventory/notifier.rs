use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Callback = Arc<dyn Fn() + Send + Sync>;

/// 订阅句柄，用于取消订阅
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    list: Vec<(SubscriptionId, Callback)>,
}

/// 背包变更广播：同步调用所有订阅者，不带载荷，订阅者自行回查背包状态。
///
/// 克隆得到的是同一个广播器，回调里可以持有克隆随时订阅/取消订阅。
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    inner: Arc<Mutex<Subscribers>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
        let mut subs = self.lock();
        let id = SubscriptionId(subs.next_id);
        subs.next_id += 1;
        subs.list.push((id, Arc::new(callback)));
        id
    }

    /// 返回该订阅是否存在
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.lock();
        let before = subs.list.len();
        subs.list.retain(|(sid, _)| *sid != id);
        subs.list.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().list.len()
    }

    /// 先拷贝订阅列表再逐个调用，回调内修改订阅不影响本轮
    pub fn notify(&self) {
        let snapshot: Vec<Callback> = self.lock().list.iter().map(|(_, cb)| Arc::clone(cb)).collect();
        for cb in snapshot {
            cb();
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
