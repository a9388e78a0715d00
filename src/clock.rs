use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// 时间来源
pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 手动推进的时钟，用于确定性的回放和测试
///
/// 克隆体共享同一个时间，可以把一份交给 reporter，另一份留在外面推进。
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        self.millis
            .fetch_add(delta.num_milliseconds(), Ordering::SeqCst);
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let millis = self.millis.load(Ordering::SeqCst);
        DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// 事件回放时使用的时钟
///
/// 事件带时间戳时固定在该时间，否则跟随系统时间。
#[derive(Debug, Clone)]
pub struct ReplayClock {
    millis: Arc<AtomicI64>,
}

impl ReplayClock {
    const FOLLOW_SYSTEM: i64 = i64::MIN;

    pub fn new() -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(Self::FOLLOW_SYSTEM)),
        }
    }

    /// 固定到事件时间
    pub fn pin(&self, at: DateTime<Utc>) {
        self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
    }

    /// 回到系统时间
    pub fn follow_system(&self) {
        self.millis.store(Self::FOLLOW_SYSTEM, Ordering::SeqCst);
    }
}

impl Default for ReplayClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ReplayClock {
    fn now(&self) -> DateTime<Utc> {
        match self.millis.load(Ordering::SeqCst) {
            Self::FOLLOW_SYSTEM => Utc::now(),
            millis => DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now),
        }
    }
}
