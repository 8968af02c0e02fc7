//! 五子棋核心库
//!
//! 包含:
//! - 棋手、坐标等核心数据结构
//! - 原地修改的棋盘模型 (落子/撤销/胜负判定)
//! - 位置编码串的解析与生成
//! - 增量更新的 Zobrist 指纹
//! - 错误类型定义

mod board;
mod codec;
mod constants;
mod error;
mod player;
mod zobrist;

pub use board::Board;
pub use codec::BoardCodec;
pub use constants::*;
pub use error::{GomokuError, Result};
pub use player::{Player, Pos};
pub use zobrist::Zobrist;
