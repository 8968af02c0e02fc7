//! 错误类型定义

use thiserror::Error;

use crate::player::Player;

/// 五子棋引擎错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GomokuError {
    /// 输入串与声明的尺寸不符或含有非法字符
    #[error("Malformed board input: {reason}")]
    MalformedInput { reason: String },

    /// 棋盘尺寸低于最小可玩大小
    #[error("Invalid board dimension: {width}x{height} (minimum {min})")]
    InvalidDimension {
        width: usize,
        height: usize,
        min: usize,
    },

    /// 非法落子（搜索内部不变量被破坏，该次求解必须终止）
    #[error("Illegal move at ({row}, {col})")]
    IllegalMove { row: usize, col: usize },

    /// 棋局已经分出胜负
    #[error("Game is already over, winner: {winner}")]
    GameOver { winner: Player },

    /// 未知的算法类型
    #[error("Unknown algorithm type: {name}")]
    UnknownAlgorithm { name: String },
}

/// 核心操作结果类型
pub type Result<T> = std::result::Result<T, GomokuError>;
