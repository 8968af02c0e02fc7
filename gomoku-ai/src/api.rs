//! 求解边界层
//!
//! 接收位置编码串与算法参数，完成校验、解码、搜索，
//! 返回可直接序列化为 JSON 的求解报告。
//! 校验顺序：尺寸 -> 解码 -> 胜负检查 -> 搜索

use std::time::Instant;

use serde::{Deserialize, Serialize};

use gomoku_core::{BoardCodec, GomokuError, Player, Result};

use crate::search::{AiConfig, AiEngine, AlgoType};

/// 求解报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    /// 行棋方编码（1 黑 / 2 白）
    pub ai_player: u8,
    /// 落子行号，终局时为 None
    pub move_r: Option<usize>,
    /// 落子列号，终局时为 None
    pub move_c: Option<usize>,
    /// 行棋方视角的评估分
    pub score: i32,
    /// 这手落下后形成五连时的获胜方编码，否则 0
    pub winning_player: u8,
    /// 实际完成的搜索深度
    pub search_depth: u8,
    /// 展开的节点数
    pub node_count: u64,
    /// 时间预算耗尽，未达到请求深度
    pub budget_exhausted: bool,
    /// 求解耗时（毫秒）
    pub cpu_time_ms: u64,
}

impl SolveReport {
    /// 序列化为 JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// 求解一手棋
///
/// `player` 缺省时按黑先的交替行棋从盘面推断行棋方
pub fn solve(
    input: &str,
    algo_type: &str,
    width: usize,
    height: usize,
    player: Option<char>,
) -> Result<SolveReport> {
    let algo: AlgoType = algo_type.parse()?;
    let mut board = BoardCodec::decode(input, width, height)?;

    // 已分胜负的棋盘拒绝继续求解
    if let Some(winner) = board.any_winner() {
        return Err(GomokuError::GameOver { winner });
    }

    let player = match player {
        Some(c) => Player::from_char(c).ok_or_else(|| GomokuError::MalformedInput {
            reason: format!("invalid player character: {:?}", c),
        })?,
        None => board.next_player(),
    };

    let start = Instant::now();
    let mut engine = AiEngine::new(AiConfig::for_algo(algo));
    let outcome = engine.solve(&mut board, player)?;
    let elapsed = start.elapsed().as_millis() as u64;

    // 报告这手棋是否直接取胜
    let mut winning_player = 0u8;
    if let Some(mv) = outcome.best_move {
        board.place(mv, player)?;
        if board.check_win(mv, player) {
            winning_player = player.index() as u8 + 1;
        }
        board.unplace(mv)?;
    }

    Ok(SolveReport {
        ai_player: player.index() as u8 + 1,
        move_r: outcome.best_move.map(|m| m.row),
        move_c: outcome.best_move.map(|m| m.col),
        score: outcome.score,
        winning_player,
        search_depth: outcome.depth_reached,
        node_count: outcome.nodes,
        budget_exhausted: outcome.budget_exhausted,
        cpu_time_ms: elapsed,
    })
}

/// 方形棋盘的旧式入口：从串长推断边长，行棋方由盘面推断
pub fn solve_square(input: &str, algo_type: &str) -> Result<SolveReport> {
    let len = input.chars().filter(|c| !c.is_whitespace()).count();
    let side = (len as f64).sqrt() as usize;
    if side * side != len {
        return Err(GomokuError::MalformedInput {
            reason: format!("length {} is not a perfect square", len),
        });
    }
    solve(input, algo_type, side, side, None)
}
