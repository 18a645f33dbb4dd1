//! 检测结果缓冲区
//!
//! 有界环形缓冲：按消费顺序保存，达到容量后淘汰最旧的一条。
//! 不去重、不持久化，进程重启即清空。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::{RelayError, Result};

#[derive(Debug)]
pub struct ResultStore {
    entries: RwLock<VecDeque<Value>>,
    capacity: usize,
    evicted: AtomicU64,
}

impl ResultStore {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(RelayError::InvalidCapacity);
        }
        Ok(Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
            evicted: AtomicU64::new(0),
        })
    }

    /// 追加一条结果，缓冲区已满时返回被淘汰的最旧结果
    pub fn push(&self, value: Value) -> Option<Value> {
        let mut entries = self.entries.write();
        let evicted = if entries.len() >= self.capacity {
            self.evicted.fetch_add(1, Ordering::Relaxed);
            entries.pop_front()
        } else {
            None
        };
        entries.push_back(value);
        evicted
    }

    /// 按消费顺序返回全部结果的副本
    pub fn snapshot(&self) -> Vec<Value> {
        self.entries.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 累计淘汰条数
    pub fn evicted_total(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }
}
