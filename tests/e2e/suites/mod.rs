//! 测试套件

mod credit_flow;
mod relay_flow;
