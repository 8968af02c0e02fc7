//! 棋盘状态
//!
//! 搜索过程中通过 place/unplace 原地修改，从不整盘复制

use crate::constants::{DIRS, MIN_BOARD_SIZE, WIN_LENGTH};
use crate::error::{GomokuError, Result};
use crate::player::{Player, Pos};
use crate::zobrist::Zobrist;

/// 棋盘
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    /// 格子状态，索引为 row * width + col
    cells: Vec<Option<Player>>,
    /// 双方落子数 [black, white]
    stones: [u32; 2],
    /// 增量维护的 Zobrist 指纹
    hash: u64,
    zobrist: Zobrist,
}

impl Board {
    /// 创建空棋盘
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width < MIN_BOARD_SIZE || height < MIN_BOARD_SIZE {
            return Err(GomokuError::InvalidDimension {
                width,
                height,
                min: MIN_BOARD_SIZE,
            });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width * height],
            stones: [0, 0],
            hash: 0,
            zobrist: Zobrist::new(width, height),
        })
    }

    /// 棋盘宽度（列数）
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// 棋盘高度（行数）
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// 坐标转数组索引
    #[inline]
    fn index(&self, pos: Pos) -> usize {
        pos.row * self.width + pos.col
    }

    /// 检查坐标是否在棋盘内
    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && (row as usize) < self.height && col >= 0 && (col as usize) < self.width
    }

    /// 获取指定格子的棋子（越界视为空）
    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Player> {
        if pos.row < self.height && pos.col < self.width {
            self.cells[self.index(pos)]
        } else {
            None
        }
    }

    /// 带边界区分的格子访问：None 表示越界，Some(None) 表示空格
    #[inline]
    pub fn cell(&self, row: i32, col: i32) -> Option<Option<Player>> {
        if self.in_bounds(row, col) {
            Some(self.cells[row as usize * self.width + col as usize])
        } else {
            None
        }
    }

    /// 落子，同时增量更新 Zobrist 指纹
    ///
    /// 格子被占用或越界时返回 IllegalMove
    pub fn place(&mut self, pos: Pos, player: Player) -> Result<()> {
        if pos.row >= self.height || pos.col >= self.width {
            return Err(GomokuError::IllegalMove {
                row: pos.row,
                col: pos.col,
            });
        }
        let idx = self.index(pos);
        if self.cells[idx].is_some() {
            return Err(GomokuError::IllegalMove {
                row: pos.row,
                col: pos.col,
            });
        }
        self.cells[idx] = Some(player);
        self.stones[player.index()] += 1;
        self.hash ^= self.zobrist.key(player, pos);
        Ok(())
    }

    /// 撤销落子，place 的严格逆操作
    ///
    /// 目标格子为空或越界时返回 IllegalMove：这意味着搜索的
    /// make/unmake 配对被破坏，该次求解不可继续
    pub fn unplace(&mut self, pos: Pos) -> Result<()> {
        if pos.row >= self.height || pos.col >= self.width {
            return Err(GomokuError::IllegalMove {
                row: pos.row,
                col: pos.col,
            });
        }
        let idx = self.index(pos);
        match self.cells[idx].take() {
            Some(player) => {
                debug_assert!(self.stones[player.index()] > 0);
                self.stones[player.index()] -= 1;
                self.hash ^= self.zobrist.key(player, pos);
                Ok(())
            }
            None => Err(GomokuError::IllegalMove {
                row: pos.row,
                col: pos.col,
            }),
        }
    }

    /// 判断最后一手是否形成五连
    ///
    /// 只扫描经过 last_move 的四条线，复杂度 O(边长)，从不整盘重扫
    pub fn check_win(&self, last_move: Pos, player: Player) -> bool {
        for (dr, dc) in DIRS {
            let mut count = 1;
            for sign in [1i32, -1i32] {
                let mut r = last_move.row as i32 + dr * sign;
                let mut c = last_move.col as i32 + dc * sign;
                while self.cell(r, c) == Some(Some(player)) {
                    count += 1;
                    r += dr * sign;
                    c += dc * sign;
                }
            }
            if count >= WIN_LENGTH {
                return true;
            }
        }
        false
    }

    /// 全盘扫描获胜方
    ///
    /// 仅在边界层校验输入时使用一次，搜索内部始终用 check_win
    pub fn any_winner(&self) -> Option<Player> {
        for (pos, player) in self.stones_iter() {
            for (dr, dc) in DIRS {
                // 只从每条连线的起点统计一次
                let prev_r = pos.row as i32 - dr;
                let prev_c = pos.col as i32 - dc;
                if self.cell(prev_r, prev_c) == Some(Some(player)) {
                    continue;
                }
                let mut count = 1;
                let mut r = pos.row as i32 + dr;
                let mut c = pos.col as i32 + dc;
                while self.cell(r, c) == Some(Some(player)) {
                    count += 1;
                    r += dr;
                    c += dc;
                }
                if count >= WIN_LENGTH {
                    return Some(player);
                }
            }
        }
        None
    }

    /// 棋盘是否已满
    #[inline]
    pub fn is_full(&self) -> bool {
        (self.stones[0] + self.stones[1]) as usize == self.width * self.height
    }

    /// 总落子数
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.stones[0] + self.stones[1]
    }

    /// 指定棋手的落子数
    #[inline]
    pub fn stones_of(&self, player: Player) -> u32 {
        self.stones[player.index()]
    }

    /// 根据交替行棋推断下一个行棋方（黑方先行）
    pub fn next_player(&self) -> Player {
        if self.stones[0] <= self.stones[1] {
            Player::Black
        } else {
            Player::White
        }
    }

    /// 当前棋盘指纹
    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.hash
    }

    /// 遍历所有落子
    pub fn stones_iter(&self) -> impl Iterator<Item = (Pos, Player)> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| {
            cell.map(|player| (Pos::new(idx / self.width, idx % self.width), player))
        })
    }

    /// 所有落子的包围盒 (row_min, row_max, col_min, col_max)，空盘返回 None
    pub fn stone_bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for (pos, _) in self.stones_iter() {
            bounds = Some(match bounds {
                None => (pos.row, pos.row, pos.col, pos.col),
                Some((rmin, rmax, cmin, cmax)) => (
                    rmin.min(pos.row),
                    rmax.max(pos.row),
                    cmin.min(pos.col),
                    cmax.max(pos.col),
                ),
            });
        }
        bounds
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.cells == other.cells
            && self.hash == other.hash
    }
}

impl Eq for Board {}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let c = match self.cells[row * self.width + col] {
                    Some(Player::Black) => " o",
                    Some(Player::White) => " +",
                    None => " .",
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
