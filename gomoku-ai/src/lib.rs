//! 五子棋 AI 引擎
//!
//! 包含:
//! - 连珠形状评估函数
//! - 候选着法生成（近邻裁剪 + 启发式排序）
//! - Minimax / Alpha-Beta / 迭代加深 / 蒙特卡洛搜索
//! - 基于棋盘指纹的置换表
//! - 位置编码串的求解边界层

mod api;
mod evaluate;
mod mcts;
mod movegen;
mod search;
mod transposition;

pub use api::{solve, solve_square, SolveReport};
pub use evaluate::{weights, Evaluator, LineRun};
pub use movegen::{Candidate, MoveGenerator};
pub use search::{AiConfig, AiEngine, AlgoType, SearchOutcome};
pub use transposition::{EntryType, TTEntry, TranspositionTable};
