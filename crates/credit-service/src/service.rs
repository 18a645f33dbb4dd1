//! 积分计费服务
//!
//! 每次计费动作固定扣除 `cost` 积分。扣减通过仓储的原子条件更新完成，
//! 同一用户的并发请求不会重复扣减，也不会把余额扣成负数。

use std::sync::Arc;

use recflux_shared::observability::metrics;
use tracing::{info, instrument, warn};
use validator::ValidateEmail;

use crate::error::{CreditError, Result};
use crate::models::{CreditCheckResult, DeductOutcome};
use crate::repository::CreditRepository;

pub struct CreditService {
    repo: Arc<dyn CreditRepository>,
    cost: i32,
}

impl CreditService {
    pub fn new(repo: Arc<dyn CreditRepository>, cost: i32) -> Result<Self> {
        if cost <= 0 {
            return Err(CreditError::Validation(format!(
                "单次扣除积分必须为正数，实际为 {cost}"
            )));
        }
        Ok(Self { repo, cost })
    }

    /// 检查余额并扣除一次计费动作的积分
    ///
    /// 余额不足返回 `has_enough_credits = false` 的结果（余额不变），
    /// 存储故障和未知用户以错误返回。
    #[instrument(skip(self))]
    pub async fn check_and_deduct_credits(&self, email: &str) -> Result<CreditCheckResult> {
        let email = normalize_email(email)?;

        let outcome = self.repo.try_deduct(email, self.cost).await.inspect_err(|e| {
            metrics::record_credit_deduction("error");
            warn!(error = %e, "积分扣减失败");
        })?;

        match outcome {
            DeductOutcome::Deducted { remaining } => {
                metrics::record_credit_deduction("deducted");
                info!(cost = self.cost, remaining, "积分扣减成功");
                Ok(CreditCheckResult::deducted(
                    remaining + self.cost,
                    remaining,
                    self.cost,
                ))
            }
            DeductOutcome::Insufficient { current } => {
                metrics::record_credit_deduction("insufficient");
                info!(cost = self.cost, current, "积分不足");
                Ok(CreditCheckResult::insufficient(current, self.cost))
            }
            DeductOutcome::UserNotFound => {
                metrics::record_credit_deduction("not_found");
                Err(CreditError::UserNotFound(email.to_string()))
            }
        }
    }

    /// 查询当前余额
    #[instrument(skip(self))]
    pub async fn get_current_credits(&self, email: &str) -> Result<i32> {
        let email = normalize_email(email)?;
        self.repo
            .get_credits(email)
            .await?
            .ok_or_else(|| CreditError::UserNotFound(email.to_string()))
    }

    pub async fn health_check(&self) -> Result<()> {
        self.repo.health_check().await
    }
}

/// 去除首尾空白并校验邮箱格式
fn normalize_email(email: &str) -> Result<&str> {
    let email = email.trim();
    if !email.validate_email() {
        return Err(CreditError::Validation(format!("邮箱格式无效: {email}")));
    }
    Ok(email)
}
