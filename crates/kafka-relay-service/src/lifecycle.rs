//! 中继连接生命周期
//!
//! 启动：disconnected -> connecting -> running
//! 关闭：running -> disconnecting -> terminated
//!
//! 只允许向前迁移；连接中失败直接进入 terminated。没有重连路径。

use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use crate::error::{RelayError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayState {
    Disconnected,
    Connecting,
    Running,
    Disconnecting,
    Terminated,
}

impl RelayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Running => "running",
            Self::Disconnecting => "disconnecting",
            Self::Terminated => "terminated",
        }
    }

    /// 是否允许迁移到 `next`
    pub fn can_transition_to(self, next: RelayState) -> bool {
        matches!(
            (self, next),
            (Self::Disconnected, Self::Connecting)
                | (Self::Connecting, Self::Running)
                | (Self::Connecting, Self::Terminated)
                | (Self::Running, Self::Disconnecting)
                | (Self::Disconnecting, Self::Terminated)
        )
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 线程安全的状态持有者
#[derive(Debug)]
pub struct Lifecycle {
    state: Mutex<RelayState>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RelayState::Disconnected),
        }
    }

    pub fn current(&self) -> RelayState {
        *self.state.lock()
    }

    pub fn is_running(&self) -> bool {
        self.current() == RelayState::Running
    }

    /// 迁移到 `next`，返回迁移前的状态
    pub fn transition(&self, next: RelayState) -> Result<RelayState> {
        let mut state = self.state.lock();
        let from = *state;
        if !from.can_transition_to(next) {
            return Err(RelayError::InvalidTransition { from, to: next });
        }
        *state = next;
        info!(from = %from, to = %next, "中继状态迁移");
        Ok(from)
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
