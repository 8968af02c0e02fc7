//! 棋手与坐标定义

use serde::{Deserialize, Serialize};

/// 棋手
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// 黑方（先手，编码字符 '1'）
    Black,
    /// 白方（后手，编码字符 '2'）
    White,
}

impl Player {
    /// 获取对方
    pub fn opponent(&self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// 获取编码字符
    pub fn to_char(&self) -> char {
        match self {
            Player::Black => '1',
            Player::White => '2',
        }
    }

    /// 从编码字符解析（兼容手绘文本棋盘的 'o'/'+' 写法）
    pub fn from_char(c: char) -> Option<Player> {
        match c {
            '1' | 'o' => Some(Player::Black),
            '2' | '+' => Some(Player::White),
            _ => None,
        }
    }

    /// 转换为数组索引
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Player::Black => 0,
            Player::White => 1,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Black => write!(f, "black"),
            Player::White => write!(f, "white"),
        }
    }
}

/// 棋盘坐标（行、列，均从 0 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    /// 行号
    pub row: usize,
    /// 列号
    pub col: usize,
}

impl Pos {
    /// 创建新坐标
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
