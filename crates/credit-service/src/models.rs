//! 积分领域模型

use serde::{Deserialize, Serialize};

/// 每次计费动作的默认扣除积分
pub const CREDIT_COST: i32 = 10;

/// 积分检查与扣减结果
///
/// 扣减失败时 `current_credits == remaining_credits`，余额未被修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCheckResult {
    pub has_enough_credits: bool,
    /// 扣减前余额
    pub current_credits: i32,
    /// 扣减后余额
    pub remaining_credits: i32,
    pub message: String,
}

impl CreditCheckResult {
    pub fn deducted(previous: i32, remaining: i32, cost: i32) -> Self {
        Self {
            has_enough_credits: true,
            current_credits: previous,
            remaining_credits: remaining,
            message: format!("已扣除 {cost} 积分，剩余 {remaining} 积分"),
        }
    }

    pub fn insufficient(current: i32, cost: i32) -> Self {
        Self {
            has_enough_credits: false,
            current_credits: current,
            remaining_credits: current,
            message: format!("积分不足：本次操作需要 {cost} 积分，当前余额 {current} 积分"),
        }
    }
}

/// 仓储层条件扣减的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeductOutcome {
    Deducted { remaining: i32 },
    Insufficient { current: i32 },
    UserNotFound,
}
