//! 搜索引擎
//!
//! Minimax 基准、Alpha-Beta 剪枝、迭代加深与蒙特卡洛四种策略，
//! 共用同一套候选生成与评估。棋盘在搜索中原地修改，每次展开
//! 严格配对 place/unplace，回到调用帧前恢复原状

use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use gomoku_core::{Board, GomokuError, Player, Pos, Result};

use crate::evaluate::{weights, Evaluator};
use crate::mcts;
use crate::movegen::MoveGenerator;
use crate::transposition::{EntryType, TranspositionTable};

/// 胜利分值，按回合数衰减使更快的胜利得分更高
pub const SCORE_WIN: i32 = weights::FIVE;
/// Alpha-Beta 窗口的无穷大
const INF: i32 = SCORE_WIN + 1;

/// 分值是否代表一条必胜线路（回合衰减不会低过此界）
fn is_winning_score(score: i32) -> bool {
    score > SCORE_WIN - 1000
}

/// 搜索策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgoType {
    /// 固定深度全宽搜索，无剪枝（正确性基准）
    Minimax,
    /// Alpha-Beta 剪枝，与同深度 Minimax 结果一致
    AlphaBeta,
    /// 迭代加深 Alpha-Beta，受时间预算约束
    IterativeDeepening,
    /// 蒙特卡洛树搜索
    MonteCarlo,
}

impl FromStr for AlgoType {
    type Err = GomokuError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "minimax" => Ok(AlgoType::Minimax),
            "alphabeta" | "negamax" => Ok(AlgoType::AlphaBeta),
            "iterative" | "iterative_deepening" => Ok(AlgoType::IterativeDeepening),
            "monte_carlo" | "mcts" => Ok(AlgoType::MonteCarlo),
            other => Err(GomokuError::UnknownAlgorithm {
                name: other.to_string(),
            }),
        }
    }
}

impl TryFrom<u8> for AlgoType {
    type Error = GomokuError;

    fn try_from(v: u8) -> Result<Self> {
        match v {
            0 => Ok(AlgoType::Minimax),
            1 => Ok(AlgoType::AlphaBeta),
            2 => Ok(AlgoType::IterativeDeepening),
            3 => Ok(AlgoType::MonteCarlo),
            other => Err(GomokuError::UnknownAlgorithm {
                name: other.to_string(),
            }),
        }
    }
}

/// AI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub algo: AlgoType,
    /// 最大搜索深度
    pub max_depth: u8,
    /// 时间预算（毫秒），仅迭代加深使用
    pub time_limit_ms: u64,
    /// 蒙特卡洛模拟次数
    pub playouts: u32,
}

impl AiConfig {
    /// 各算法的默认配置
    pub fn for_algo(algo: AlgoType) -> Self {
        match algo {
            AlgoType::Minimax => Self {
                algo,
                max_depth: 2,
                time_limit_ms: 0,
                playouts: 0,
            },
            AlgoType::AlphaBeta => Self {
                algo,
                max_depth: 3,
                time_limit_ms: 0,
                playouts: 0,
            },
            AlgoType::IterativeDeepening => Self {
                algo,
                max_depth: 6,
                time_limit_ms: 1000,
                playouts: 0,
            },
            AlgoType::MonteCarlo => Self {
                algo,
                max_depth: 0,
                time_limit_ms: 0,
                playouts: 500,
            },
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::for_algo(AlgoType::AlphaBeta)
    }
}

/// 搜索结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// 最佳着法；输入已是终局时为 None
    pub best_move: Option<Pos>,
    /// 行棋方视角的评估分
    pub score: i32,
    /// 输入局面是否已无棋可走
    pub terminal: bool,
    /// 实际完成的搜索深度
    pub depth_reached: u8,
    /// 时间预算耗尽，未达到请求深度
    pub budget_exhausted: bool,
    /// 展开的节点数（蒙特卡洛下为模拟次数）
    pub nodes: u64,
}

/// AI 引擎
///
/// 单次 solve 独占引擎与棋盘；并发求解各建各的引擎实例
pub struct AiEngine {
    config: AiConfig,
    tt: TranspositionTable,
    nodes: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            tt: TranspositionTable::new(16),
            nodes: 0,
        }
    }

    /// 以算法默认配置创建
    pub fn from_algo(algo: AlgoType) -> Self {
        Self::new(AiConfig::for_algo(algo))
    }

    /// 引擎配置
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 上次求解展开的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes
    }

    /// 求解最佳着法
    pub fn solve(&mut self, board: &mut Board, player: Player) -> Result<SearchOutcome> {
        self.nodes = 0;
        self.tt.clear();

        // 已分胜负的棋盘不可继续行棋
        if let Some(winner) = board.any_winner() {
            return Err(GomokuError::GameOver { winner });
        }

        // 满盘即终局，不再调用着法生成
        if board.is_full() {
            return Ok(SearchOutcome {
                best_move: None,
                score: Evaluator::evaluate(board, player),
                terminal: true,
                depth_reached: 0,
                budget_exhausted: false,
                nodes: 0,
            });
        }

        // 深度或时间预算为零：只做静态评估，不展开
        let zero_depth = self.config.max_depth == 0 && self.config.algo != AlgoType::MonteCarlo;
        let zero_time =
            self.config.algo == AlgoType::IterativeDeepening && self.config.time_limit_ms == 0;
        if zero_depth || zero_time {
            return Ok(SearchOutcome {
                best_move: None,
                score: Evaluator::evaluate(board, player),
                terminal: false,
                depth_reached: 0,
                budget_exhausted: zero_time && self.config.max_depth > 0,
                nodes: 0,
            });
        }

        let start = Instant::now();
        let outcome = match self.config.algo {
            AlgoType::Minimax => self.solve_minimax(board, player)?,
            AlgoType::AlphaBeta => self.solve_alphabeta(board, player)?,
            AlgoType::IterativeDeepening => self.solve_iterative(board, player)?,
            AlgoType::MonteCarlo => self.solve_monte_carlo(board, player)?,
        };
        info!(
            algo = ?self.config.algo,
            depth = outcome.depth_reached,
            nodes = outcome.nodes,
            score = outcome.score,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "solve finished"
        );
        Ok(outcome)
    }

    /// 固定深度全宽搜索，作为剪枝算法的正确性基准
    fn solve_minimax(&mut self, board: &mut Board, player: Player) -> Result<SearchOutcome> {
        let depth = self.config.max_depth;
        let cands = MoveGenerator::candidates(board, player)?;
        if cands.is_empty() {
            return Ok(self.leaf_outcome(board, player));
        }

        let mut best_move = None;
        let mut best = -INF;
        for cand in &cands {
            board.place(cand.pos, player)?;
            let score = if board.check_win(cand.pos, player) {
                SCORE_WIN - 1
            } else {
                -self.minimax(board, player.opponent(), depth - 1, 1)?
            };
            board.unplace(cand.pos)?;

            if score > best {
                best = score;
                best_move = Some(cand.pos);
            }
        }

        Ok(SearchOutcome {
            best_move,
            score: best,
            terminal: false,
            depth_reached: depth,
            budget_exhausted: false,
            nodes: self.nodes,
        })
    }

    fn minimax(&mut self, board: &mut Board, to_move: Player, depth: u8, ply: u8) -> Result<i32> {
        self.nodes += 1;
        if depth == 0 {
            return Ok(Evaluator::evaluate(board, to_move));
        }
        let cands = MoveGenerator::candidates(board, to_move)?;
        if cands.is_empty() {
            return Ok(Evaluator::evaluate(board, to_move));
        }

        let mut best = -INF;
        for cand in &cands {
            board.place(cand.pos, to_move)?;
            let score = if board.check_win(cand.pos, to_move) {
                SCORE_WIN - (ply as i32 + 1)
            } else {
                -self.minimax(board, to_move.opponent(), depth - 1, ply + 1)?
            };
            board.unplace(cand.pos)?;

            if score > best {
                best = score;
            }
        }
        Ok(best)
    }

    /// 固定深度 Alpha-Beta
    fn solve_alphabeta(&mut self, board: &mut Board, player: Player) -> Result<SearchOutcome> {
        let depth = self.config.max_depth;
        let (best_move, score) = self
            .alphabeta_root(board, player, depth, None)?
            .unwrap_or((None, Evaluator::evaluate(board, player)));

        Ok(SearchOutcome {
            best_move,
            score,
            terminal: best_move.is_none(),
            depth_reached: depth,
            budget_exhausted: false,
            nodes: self.nodes,
        })
    }

    /// 迭代加深：深度递增重复 Alpha-Beta，直至预算耗尽
    ///
    /// 未完成的一轮整体作废，始终返回最深一轮完整结果；
    /// 第一层不设超时，保证任何预算下都有完整的着法
    fn solve_iterative(&mut self, board: &mut Board, player: Player) -> Result<SearchOutcome> {
        let deadline = Instant::now() + Duration::from_millis(self.config.time_limit_ms);
        let mut completed: Option<(Option<Pos>, i32, u8)> = None;

        for depth in 1..=self.config.max_depth {
            if depth > 1 && Instant::now() >= deadline {
                break;
            }
            let iter_deadline = if depth == 1 { None } else { Some(deadline) };
            match self.alphabeta_root(board, player, depth, iter_deadline)? {
                Some((mv, score)) => {
                    debug!(depth, score, nodes = self.nodes, "iteration complete");
                    completed = Some((mv, score, depth));
                    // 已找到必胜线路，更深的搜索不会改善
                    if is_winning_score(score) {
                        break;
                    }
                }
                None => {
                    debug!(depth, "iteration aborted by deadline");
                    break;
                }
            }
        }

        let (best_move, score, depth_reached) =
            completed.unwrap_or((None, Evaluator::evaluate(board, player), 0));
        Ok(SearchOutcome {
            best_move,
            score,
            terminal: false,
            depth_reached,
            budget_exhausted: depth_reached < self.config.max_depth && !is_winning_score(score),
            nodes: self.nodes,
        })
    }

    /// 根节点展开
    ///
    /// 超时返回 Ok(None)，整轮结果作废；多个同分着法取生成顺序在前者
    fn alphabeta_root(
        &mut self,
        board: &mut Board,
        player: Player,
        depth: u8,
        deadline: Option<Instant>,
    ) -> Result<Option<(Option<Pos>, i32)>> {
        let cands = MoveGenerator::candidates(board, player)?;
        if cands.is_empty() {
            return Ok(Some((None, Evaluator::evaluate(board, player))));
        }

        let mut alpha = -INF;
        let mut best_move = None;
        let mut best = -INF;
        for cand in &cands {
            board.place(cand.pos, player)?;
            let score = if board.check_win(cand.pos, player) {
                Some(SCORE_WIN - 1)
            } else {
                self.alphabeta(board, player.opponent(), depth - 1, 1, -INF, -alpha, deadline)?
                    .map(|s| -s)
            };
            board.unplace(cand.pos)?;

            let score = match score {
                Some(s) => s,
                None => return Ok(None),
            };
            if score > best {
                best = score;
                best_move = Some(cand.pos);
            }
            alpha = alpha.max(best);
        }
        Ok(Some((best_move, best)))
    }

    /// Fail-soft 负极大 Alpha-Beta，带置换表
    fn alphabeta(
        &mut self,
        board: &mut Board,
        to_move: Player,
        depth: u8,
        ply: u8,
        mut alpha: i32,
        mut beta: i32,
        deadline: Option<Instant>,
    ) -> Result<Option<i32>> {
        self.nodes += 1;

        // 协作式超时检查，放弃本轮结果而非返回残缺值
        if let Some(d) = deadline {
            if Instant::now() >= d {
                return Ok(None);
            }
        }
        if depth == 0 {
            return Ok(Some(Evaluator::evaluate(board, to_move)));
        }

        let hash = board.fingerprint();
        let alpha_orig = alpha;
        if let Some(entry) = self.tt.probe(hash, depth) {
            match entry.entry_type {
                EntryType::Exact => return Ok(Some(entry.score)),
                EntryType::LowerBound => alpha = alpha.max(entry.score),
                EntryType::UpperBound => beta = beta.min(entry.score),
            }
            if alpha >= beta {
                return Ok(Some(entry.score));
            }
        }

        let cands = MoveGenerator::candidates(board, to_move)?;
        if cands.is_empty() {
            return Ok(Some(Evaluator::evaluate(board, to_move)));
        }

        let mut best = -INF;
        let mut best_pos = None;
        for cand in &cands {
            board.place(cand.pos, to_move)?;
            let score = if board.check_win(cand.pos, to_move) {
                Some(SCORE_WIN - (ply as i32 + 1))
            } else {
                self.alphabeta(
                    board,
                    to_move.opponent(),
                    depth - 1,
                    ply + 1,
                    -beta,
                    -alpha,
                    deadline,
                )?
                .map(|s| -s)
            };
            board.unplace(cand.pos)?;

            let score = match score {
                Some(s) => s,
                None => return Ok(None),
            };
            if score > best {
                best = score;
                best_pos = Some(cand.pos);
            }
            alpha = alpha.max(best);
            if alpha >= beta {
                // Beta 截断
                break;
            }
        }

        let entry_type = if best <= alpha_orig {
            EntryType::UpperBound
        } else if best >= beta {
            EntryType::LowerBound
        } else {
            EntryType::Exact
        };
        self.tt.store(hash, best, depth, entry_type, best_pos);
        Ok(Some(best))
    }

    /// 蒙特卡洛树搜索
    fn solve_monte_carlo(&mut self, board: &mut Board, player: Player) -> Result<SearchOutcome> {
        let outcome = mcts::search(board, player, self.config.playouts)?;
        self.nodes = outcome.playouts as u64;
        Ok(SearchOutcome {
            best_move: outcome.best_move,
            score: outcome.score,
            terminal: outcome.best_move.is_none(),
            depth_reached: 0,
            budget_exhausted: false,
            nodes: self.nodes,
        })
    }

    /// 无候选着法时的终局结果
    fn leaf_outcome(&self, board: &Board, player: Player) -> SearchOutcome {
        SearchOutcome {
            best_move: None,
            score: Evaluator::evaluate(board, player),
            terminal: true,
            depth_reached: 0,
            budget_exhausted: false,
            nodes: self.nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_core::BoardCodec;

    fn engine(algo: AlgoType, depth: u8) -> AiEngine {
        AiEngine::new(AiConfig {
            algo,
            max_depth: depth,
            time_limit_ms: 1000,
            playouts: 200,
        })
    }

    #[test]
    fn test_first_move_is_center() {
        let mut board = Board::new(15, 15).unwrap();
        let outcome = engine(AlgoType::AlphaBeta, 2)
            .solve(&mut board, Player::Black)
            .unwrap();
        assert_eq!(outcome.best_move, Some(Pos::new(7, 7)));
    }

    #[test]
    fn test_completes_open_four() {
        // 黑方四连开一端，深度 1 即应选择成五点并报告必胜分
        let mut board = Board::new(15, 15).unwrap();
        board.place(Pos::new(7, 2), Player::White).unwrap();
        for col in 3..7 {
            board.place(Pos::new(7, col), Player::Black).unwrap();
        }
        let mut eng = engine(AlgoType::AlphaBeta, 1);
        let outcome = eng.solve(&mut board, Player::Black).unwrap();
        assert_eq!(outcome.best_move, Some(Pos::new(7, 7)));
        assert!(is_winning_score(outcome.score), "应报必胜分: {}", outcome.score);
    }

    #[test]
    fn test_blocks_opponent_four() {
        let mut board = Board::new(15, 15).unwrap();
        board.place(Pos::new(0, 0), Player::Black).unwrap();
        board.place(Pos::new(1, 1), Player::Black).unwrap();
        board.place(Pos::new(1, 0), Player::Black).unwrap();
        // 白方四连只开 (0,5) 一端
        for col in 1..5 {
            board.place(Pos::new(0, col), Player::White).unwrap();
        }
        let outcome = engine(AlgoType::AlphaBeta, 2)
            .solve(&mut board, Player::Black)
            .unwrap();
        assert_eq!(outcome.best_move, Some(Pos::new(0, 5)));
    }

    #[test]
    fn test_alphabeta_matches_minimax() {
        // 剪枝是纯性能优化：同深度下着法与分值必须与基准一致
        let positions = [
            "000000000000000
             000000000000000
             000000000000000
             000000000000000
             000000000000000
             000000021000000
             000000120000000
             000000210000000
             000000000000000
             000000000000000
             000000000000000
             000000000000000
             000000000000000
             000000000000000
             000000000000000",
            "000000000000000
             000000000000000
             000000000000000
             000000000000000
             000000000000000
             000000110000000
             000002220000000
             000000100000000
             000000000000000
             000000000000000
             000000000000000
             000000000000000
             000000000000000
             000000000000000
             000000000000000",
        ];
        for input in &positions {
            for player in [Player::Black, Player::White] {
                let mut board = BoardCodec::decode(input, 15, 15).unwrap();
                let reference = engine(AlgoType::Minimax, 2)
                    .solve(&mut board, player)
                    .unwrap();
                let pruned = engine(AlgoType::AlphaBeta, 2)
                    .solve(&mut board, player)
                    .unwrap();
                assert_eq!(pruned.best_move, reference.best_move, "着法必须一致");
                assert_eq!(pruned.score, reference.score, "分值必须一致");
            }
        }
    }

    #[test]
    fn test_full_board_is_terminal() {
        // 5x5 满盘无胜者
        let mut board = BoardCodec::decode("1122112112221211121222112", 5, 5).unwrap();
        let outcome = engine(AlgoType::AlphaBeta, 4)
            .solve(&mut board, Player::Black)
            .unwrap();
        assert_eq!(outcome.best_move, None);
        assert!(outcome.terminal);
    }

    #[test]
    fn test_depth_zero_static_eval() {
        let mut board = Board::new(15, 15).unwrap();
        board.place(Pos::new(7, 7), Player::Black).unwrap();
        let outcome = engine(AlgoType::AlphaBeta, 0)
            .solve(&mut board, Player::White)
            .unwrap();
        assert_eq!(outcome.best_move, None);
        assert!(!outcome.terminal);
        assert_eq!(outcome.depth_reached, 0);
        assert_eq!(outcome.nodes, 0);
    }

    #[test]
    fn test_solve_rejects_finished_game() {
        let mut board = Board::new(15, 15).unwrap();
        for col in 2..7 {
            board.place(Pos::new(3, col), Player::Black).unwrap();
        }
        let err = engine(AlgoType::AlphaBeta, 2)
            .solve(&mut board, Player::White)
            .unwrap_err();
        assert_eq!(
            err,
            GomokuError::GameOver {
                winner: Player::Black
            }
        );
    }

    #[test]
    fn test_solve_is_deterministic() {
        let input = "000000000000000
                     000000000000000
                     000000000000000
                     000000000000000
                     000000000000000
                     000000021000000
                     000000120000000
                     000000210000000
                     000000000000000
                     000000000000000
                     000000000000000
                     000000000000000
                     000000000000000
                     000000000000000
                     000000000000000";
        for algo in [AlgoType::Minimax, AlgoType::AlphaBeta, AlgoType::MonteCarlo] {
            let mut board = BoardCodec::decode(input, 15, 15).unwrap();
            let a = engine(algo, 2).solve(&mut board, Player::Black).unwrap();
            let b = engine(algo, 2).solve(&mut board, Player::Black).unwrap();
            assert_eq!(a.best_move, b.best_move, "{:?} 结果必须可复现", algo);
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn test_search_restores_board() {
        let input = "000000000000000
                     000000000000000
                     000000000000000
                     000000000000000
                     000000000000000
                     000000021000000
                     000000120000000
                     000000210000000
                     000000000000000
                     000000000000000
                     000000000000000
                     000000000000000
                     000000000000000
                     000000000000000
                     000000000000000";
        let mut board = BoardCodec::decode(input, 15, 15).unwrap();
        let before = board.clone();
        engine(AlgoType::AlphaBeta, 2)
            .solve(&mut board, Player::Black)
            .unwrap();
        assert_eq!(board, before, "搜索结束后棋盘必须恢复原状");
    }

    #[test]
    fn test_iterative_deepening_returns_move() {
        let mut board = Board::new(15, 15).unwrap();
        board.place(Pos::new(7, 7), Player::Black).unwrap();
        board.place(Pos::new(8, 8), Player::White).unwrap();

        let mut eng = AiEngine::new(AiConfig {
            algo: AlgoType::IterativeDeepening,
            max_depth: 2,
            time_limit_ms: 2000,
            playouts: 0,
        });
        let outcome = eng.solve(&mut board, Player::Black).unwrap();
        assert!(outcome.best_move.is_some());
        assert!(outcome.depth_reached >= 1);
    }

    #[test]
    fn test_iterative_deepening_zero_budget() {
        // 时间预算为零：不展开，返回静态评估并标记预算耗尽
        let mut board = Board::new(15, 15).unwrap();
        board.place(Pos::new(7, 7), Player::Black).unwrap();

        let mut eng = AiEngine::new(AiConfig {
            algo: AlgoType::IterativeDeepening,
            max_depth: 6,
            time_limit_ms: 0,
            playouts: 0,
        });
        let outcome = eng.solve(&mut board, Player::White).unwrap();
        assert_eq!(outcome.best_move, None);
        assert_eq!(outcome.depth_reached, 0);
        assert!(outcome.budget_exhausted);
        assert_eq!(outcome.nodes, 0);
    }

    #[test]
    fn test_iterative_deepening_tiny_budget() {
        // 预算很小时第一层仍会完整跑完，未完成的深层整体作废
        let mut board = Board::new(15, 15).unwrap();
        board.place(Pos::new(7, 7), Player::Black).unwrap();

        let mut eng = AiEngine::new(AiConfig {
            algo: AlgoType::IterativeDeepening,
            max_depth: 6,
            time_limit_ms: 1,
            playouts: 0,
        });
        let outcome = eng.solve(&mut board, Player::White).unwrap();
        assert!(outcome.best_move.is_some());
        assert!(outcome.depth_reached >= 1);
        assert!(outcome.depth_reached < 6);
        assert!(outcome.budget_exhausted);
    }

    #[test]
    fn test_algo_type_parsing() {
        assert_eq!("minimax".parse::<AlgoType>().unwrap(), AlgoType::Minimax);
        assert_eq!("negamax".parse::<AlgoType>().unwrap(), AlgoType::AlphaBeta);
        assert_eq!(
            "mcts".parse::<AlgoType>().unwrap(),
            AlgoType::MonteCarlo
        );
        assert!(matches!(
            "quantum".parse::<AlgoType>(),
            Err(GomokuError::UnknownAlgorithm { .. })
        ));

        assert_eq!(AlgoType::try_from(2).unwrap(), AlgoType::IterativeDeepening);
        assert!(AlgoType::try_from(9).is_err());
    }
}
