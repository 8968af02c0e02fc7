//! 蒙特卡洛树搜索
//!
//! UCT 选择 + 随机模拟。节点存放在 Vec 竞技场中，父子关系用
//! 下标表示。随机数种子取自棋盘指纹，相同输入结果可复现

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use gomoku_core::{Board, Player, Pos, Result};

use crate::evaluate::Evaluator;
use crate::movegen::MoveGenerator;

/// UCT 探索常数
const EXPLORATION: f64 = 1.414;
/// 单次模拟的最大回合数，到限后改用静态评估判定
const ROLLOUT_CAP: u32 = 40;
/// 模拟随机数种子的扰动项
const SEED_SALT: u64 = 0x4D43_5453;

type Id = usize;

/// 搜索树节点
#[derive(Debug)]
struct Node {
    parent: Id,
    children: Vec<Id>,
    visits: u32,
    /// 从"走入该节点的一方"视角累计的胜局（和局记 0.5）
    wins: f64,
    /// 到达该节点的着法（根节点为 None）
    action: Option<Pos>,
    /// 该节点局面下的行棋方
    to_move: Player,
    /// 尚未展开的候选着法，保持启发式排序
    untried: Vec<Pos>,
    /// 该着法直接终结棋局时的获胜方
    terminal_winner: Option<Player>,
}

/// 蒙特卡洛搜索结果
#[derive(Debug, Clone)]
pub struct MctsOutcome {
    pub best_move: Option<Pos>,
    /// 胜率映射到 [-1000, 1000] 的评分
    pub score: i32,
    /// 实际执行的模拟次数
    pub playouts: u32,
}

/// 以固定模拟次数搜索最佳着法
pub fn search(board: &mut Board, player: Player, playouts: u32) -> Result<MctsOutcome> {
    let root_cands: Vec<Pos> = MoveGenerator::candidates(board, player)?
        .iter()
        .map(|c| c.pos)
        .collect();
    if root_cands.is_empty() {
        return Ok(MctsOutcome {
            best_move: None,
            score: Evaluator::evaluate(board, player),
            playouts: 0,
        });
    }
    // 唯一候选（直接取胜或必挡）无需模拟
    if root_cands.len() == 1 {
        return Ok(MctsOutcome {
            best_move: Some(root_cands[0]),
            score: 0,
            playouts: 0,
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(board.fingerprint() ^ SEED_SALT);
    let mut tree = vec![Node {
        parent: 0,
        children: Vec::new(),
        visits: 0,
        wins: 0.0,
        action: None,
        to_move: player,
        untried: root_cands.clone(),
        terminal_winner: None,
    }];

    for _ in 0..playouts {
        let mut scratch = board.clone();

        // 1. 选择：沿 UCT 最大的子节点下行，同步重放着法
        let mut id = 0;
        while tree[id].untried.is_empty() && !tree[id].children.is_empty() {
            id = select_uct(&tree, id);
            if let Some(action) = tree[id].action {
                scratch.place(action, tree[id].to_move.opponent())?;
            }
        }

        // 2. 展开：取启发式排序最靠前的未试着法
        if tree[id].terminal_winner.is_none() && !tree[id].untried.is_empty() {
            let action = tree[id].untried.remove(0);
            let mover = tree[id].to_move;
            scratch.place(action, mover)?;

            let won = scratch.check_win(action, mover);
            let next = mover.opponent();
            let untried = if won {
                Vec::new()
            } else {
                MoveGenerator::candidates(&mut scratch, next)?
                    .iter()
                    .map(|c| c.pos)
                    .collect()
            };
            tree.push(Node {
                parent: id,
                children: Vec::new(),
                visits: 0,
                wins: 0.0,
                action: Some(action),
                to_move: next,
                untried,
                terminal_winner: if won { Some(mover) } else { None },
            });
            let child_id = tree.len() - 1;
            tree[id].children.push(child_id);
            id = child_id;
        }

        // 3. 模拟
        let winner = match tree[id].terminal_winner {
            Some(w) => Some(w),
            None => rollout(&mut scratch, tree[id].to_move, &mut rng)?,
        };

        // 4. 回传
        backpropagate(&mut tree, id, winner);
    }

    // 取访问次数最多的子节点，同票保持候选顺序
    let root = &tree[0];
    if root.children.is_empty() {
        return Ok(MctsOutcome {
            best_move: Some(root_cands[0]),
            score: 0,
            playouts: 0,
        });
    }
    let mut best = root.children[0];
    for &child in &root.children {
        if tree[child].visits > tree[best].visits {
            best = child;
        }
    }
    let rate = tree[best].wins / tree[best].visits.max(1) as f64;
    Ok(MctsOutcome {
        best_move: tree[best].action,
        score: ((rate - 0.5) * 2000.0) as i32,
        playouts,
    })
}

/// 以 UCT 值选择子节点
fn select_uct(tree: &[Node], id: Id) -> Id {
    let parent_visits = tree[id].visits.max(1) as f64;
    let mut best = tree[id].children[0];
    let mut best_value = f64::NEG_INFINITY;
    for &child in &tree[id].children {
        let node = &tree[child];
        let visits = node.visits.max(1) as f64;
        let value = node.wins / visits + EXPLORATION * (parent_visits.ln() / visits).sqrt();
        if value > best_value {
            best_value = value;
            best = child;
        }
    }
    best
}

/// 将模拟结果沿父链回传
fn backpropagate(tree: &mut [Node], mut id: Id, winner: Option<Player>) {
    loop {
        let node = &mut tree[id];
        node.visits += 1;
        // 每个节点从走入它的一方视角计分
        let mover = node.to_move.opponent();
        node.wins += match winner {
            Some(w) if w == mover => 1.0,
            Some(_) => 0.0,
            None => 0.5,
        };
        if id == 0 {
            break;
        }
        id = node.parent;
    }
}

/// 随机模拟至分出胜负、无处可落或达到回合上限
fn rollout(scratch: &mut Board, first: Player, rng: &mut ChaCha8Rng) -> Result<Option<Player>> {
    let mut to_move = first;
    for _ in 0..ROLLOUT_CAP {
        let moves = rollout_moves(scratch);
        if moves.is_empty() {
            return Ok(None);
        }
        let pos = moves[rng.gen_range(0..moves.len())];
        scratch.place(pos, to_move)?;
        if scratch.check_win(pos, to_move) {
            return Ok(Some(to_move));
        }
        to_move = to_move.opponent();
    }
    // 回合上限：以静态评估近似判定
    let eval = Evaluator::evaluate(scratch, to_move);
    Ok(if eval > 0 {
        Some(to_move)
    } else if eval < 0 {
        Some(to_move.opponent())
    } else {
        None
    })
}

/// 模拟用的轻量候选：棋子包围盒外扩一圈内的空格
fn rollout_moves(board: &Board) -> Vec<Pos> {
    let (rmin, rmax, cmin, cmax) = match board.stone_bounds() {
        Some(bounds) => bounds,
        None => return vec![Pos::new(board.height() / 2, board.width() / 2)],
    };
    let rlo = rmin.saturating_sub(1);
    let rhi = (rmax + 1).min(board.height() - 1);
    let clo = cmin.saturating_sub(1);
    let chi = (cmax + 1).min(board.width() - 1);

    let mut moves = Vec::new();
    for row in rlo..=rhi {
        for col in clo..=chi {
            let pos = Pos::new(row, col);
            if board.get(pos).is_none() {
                moves.push(pos);
            }
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mcts_takes_winning_move() {
        let mut board = Board::new(15, 15).unwrap();
        board.place(Pos::new(7, 2), Player::White).unwrap();
        for col in 3..7 {
            board.place(Pos::new(7, col), Player::Black).unwrap();
        }
        let outcome = search(&mut board, Player::Black, 100).unwrap();
        assert_eq!(outcome.best_move, Some(Pos::new(7, 7)));
    }

    #[test]
    fn test_mcts_deterministic() {
        let mut board = Board::new(15, 15).unwrap();
        board.place(Pos::new(7, 7), Player::Black).unwrap();
        board.place(Pos::new(8, 8), Player::White).unwrap();
        board.place(Pos::new(6, 6), Player::Black).unwrap();

        let a = search(&mut board.clone(), Player::White, 150).unwrap();
        let b = search(&mut board.clone(), Player::White, 150).unwrap();
        assert_eq!(a.best_move, b.best_move, "相同输入结果必须一致");
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn test_mcts_restores_input_board() {
        let mut board = Board::new(15, 15).unwrap();
        board.place(Pos::new(7, 7), Player::Black).unwrap();
        board.place(Pos::new(7, 8), Player::White).unwrap();
        let before = board.clone();

        search(&mut board, Player::Black, 80).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_mcts_zero_playouts_falls_back_to_ordering() {
        let mut board = Board::new(15, 15).unwrap();
        for col in [6, 7, 8] {
            board.place(Pos::new(7, col), Player::Black).unwrap();
        }
        board.place(Pos::new(6, 7), Player::White).unwrap();

        // 不做任何模拟时退回启发式排序的首位候选
        let outcome = search(&mut board, Player::Black, 0).unwrap();
        assert!(outcome.best_move.is_some());
        assert_eq!(outcome.playouts, 0);
    }
}
