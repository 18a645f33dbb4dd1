//! 积分计费测试套件

use crate::setup::TestEnvironment;
use reqwest::StatusCode;
use std::sync::Arc;
use uuid::Uuid;

fn test_email(tag: &str) -> String {
    format!("{tag}-{}@e2e.recflux.app", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "需要运行服务"]
async fn test_deduct_full_balance() {
    let env = TestEnvironment::setup().await.unwrap();
    let email = test_email("full");
    env.db.seed_user(&email, 10).await.unwrap();

    let (status, body) = env.credits.deduct_credits(&email).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["hasEnoughCredits"], true);
    assert_eq!(body["data"]["currentCredits"], 10);
    assert_eq!(body["data"]["remainingCredits"], 0);

    assert_eq!(env.db.credits_of(&email).await.unwrap(), Some(0));
    env.db.delete_user(&email).await.unwrap();
}

#[tokio::test]
#[ignore = "需要运行服务"]
async fn test_insufficient_balance_unchanged() {
    let env = TestEnvironment::setup().await.unwrap();
    let email = test_email("short");
    env.db.seed_user(&email, 5).await.unwrap();

    let (status, body) = env.credits.deduct_credits(&email).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INSUFFICIENT_CREDITS");
    assert_eq!(body["data"]["hasEnoughCredits"], false);

    let (status, body) = env.credits.get_credits(&email).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["credits"], 5);
    env.db.delete_user(&email).await.unwrap();
}

#[tokio::test]
#[ignore = "需要运行服务"]
async fn test_unknown_user_not_found() {
    let env = TestEnvironment::setup().await.unwrap();

    let (status, body) = env
        .credits
        .deduct_credits(&test_email("ghost"))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "USER_NOT_FOUND");
}

#[tokio::test]
#[ignore = "需要运行服务"]
async fn test_concurrent_deductions_charge_once() {
    let env = Arc::new(TestEnvironment::setup().await.unwrap());
    let email = test_email("race");
    env.db.seed_user(&email, 10).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..5 {
        let env = env.clone();
        let email = email.clone();
        handles.push(tokio::spawn(async move {
            env.credits.deduct_credits(&email).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        let (_, body) = handle.await.unwrap().unwrap();
        if body["data"]["hasEnoughCredits"] == true {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(env.db.credits_of(&email).await.unwrap(), Some(0));
    env.db.delete_user(&email).await.unwrap();
}
