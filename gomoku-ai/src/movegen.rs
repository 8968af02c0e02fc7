//! 候选着法生成
//!
//! 大棋盘上的战术区域远小于全盘：只考虑已有棋子切比雪夫
//! 半径内的空格，并按局部评分排序，保证剪枝效率

use gomoku_core::{Board, Player, Pos, Result, CANDIDATE_RADIUS};

use crate::evaluate::{weights, Evaluator};

/// 候选着法
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub pos: Pos,
    /// 己方落此点的局部评分
    pub score: i32,
    /// 对方落此点的局部评分（防守价值）
    pub reply_score: i32,
}

/// 着法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成排序后的候选着法
    ///
    /// 空盘只给中心一点。存在直接成五的点时只返回该点；
    /// 否则若对方有成五点，只返回挡点。其余情况按
    /// max(score, reply_score) 降序，同分保持行优先扫描顺序。
    /// 棋盘已满时返回空表
    pub fn candidates(board: &mut Board, player: Player) -> Result<Vec<Candidate>> {
        if board.stone_count() == 0 {
            return Ok(vec![Candidate {
                pos: Pos::new(board.height() / 2, board.width() / 2),
                score: 0,
                reply_score: 0,
            }]);
        }

        let (rmin, rmax, cmin, cmax) = match board.stone_bounds() {
            Some(bounds) => bounds,
            None => return Ok(Vec::new()),
        };
        let rlo = (rmin as i32 - CANDIDATE_RADIUS).max(0) as usize;
        let rhi = ((rmax as i32 + CANDIDATE_RADIUS) as usize).min(board.height() - 1);
        let clo = (cmin as i32 - CANDIDATE_RADIUS).max(0) as usize;
        let chi = ((cmax as i32 + CANDIDATE_RADIUS) as usize).min(board.width() - 1);

        let mut moves = Vec::new();
        let mut win_at = None;
        let mut block_at = None;

        for row in rlo..=rhi {
            for col in clo..=chi {
                let pos = Pos::new(row, col);
                if board.get(pos).is_some() || Self::is_remote(board, pos) {
                    continue;
                }

                board.place(pos, player)?;
                let score = Evaluator::score_point(board, pos, player);
                board.unplace(pos)?;

                let opponent = player.opponent();
                board.place(pos, opponent)?;
                let reply_score = Evaluator::score_point(board, pos, opponent);
                board.unplace(pos)?;

                if score >= weights::FIVE && win_at.is_none() {
                    win_at = Some(moves.len());
                }
                if reply_score >= weights::FIVE && block_at.is_none() {
                    block_at = Some(moves.len());
                }
                moves.push(Candidate {
                    pos,
                    score,
                    reply_score,
                });
            }
        }

        // 己方可直接成五：唯一值得走的一手
        if let Some(i) = win_at {
            return Ok(vec![moves[i]]);
        }
        // 对方下一手成五：必须去挡
        if let Some(i) = block_at {
            return Ok(vec![moves[i]]);
        }

        // 稳定排序，同分保持扫描顺序作为确定性的平局裁决
        moves.sort_by_key(|m| std::cmp::Reverse(m.score.max(m.reply_score)));
        Ok(moves)
    }

    /// 与所有棋子的切比雪夫距离都超过半径的远点
    fn is_remote(board: &Board, pos: Pos) -> bool {
        for dr in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
            for dc in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
                if dr == 0 && dc == 0 {
                    continue;
                }
                if let Some(Some(_)) = board.cell(pos.row as i32 + dr, pos.col as i32 + dc) {
                    return false;
                }
            }
        }
        true
    }
}
