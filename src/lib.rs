//! 眼鏡フレーム提案CLIのライブラリ部
//!
//! 照合ロジックと共有型は eyewear_advisor_common、
//! ここではAI連携・設定・入出力を扱う。

pub mod advisor;
pub mod ai_provider;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod prescription;
pub mod snapshot;
