//! Zobrist 指纹
//!
//! 为每个格子的每方棋子生成随机键，棋盘指纹为所有已落子键的异或，
//! 随 place/unplace 增量更新，搜索中从不整盘重算

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::player::{Player, Pos};

/// 键表种子（固定种子保证相同尺寸生成相同键表）
const ZOBRIST_SEED: u64 = 0x476F_6D6F_6B75_5A6B;

/// Zobrist 键表
#[derive(Debug, Clone)]
pub struct Zobrist {
    width: usize,
    /// 键表，索引为 player.index() * 格子数 + row * width + col
    keys: Vec<u64>,
}

impl Zobrist {
    /// 为指定尺寸的棋盘生成键表
    pub fn new(width: usize, height: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(ZOBRIST_SEED);
        let cells = width * height;
        let keys = (0..cells * 2).map(|_| rng.gen()).collect();
        Self { width, keys }
    }

    /// 获取指定格子、指定棋手的键
    #[inline]
    pub fn key(&self, player: Player, pos: Pos) -> u64 {
        let cells = self.keys.len() / 2;
        self.keys[player.index() * cells + pos.row * self.width + pos.col]
    }
}
