//! 局面评估函数
//!
//! 基于连珠形状打分：对经过某点的四条方向线分别识别
//! 活四/冲四/活三等形状，再按单调递增的权重表汇总

use gomoku_core::{Board, Player, Pos, DIRS, WIN_LENGTH};

/// 形状权重表
///
/// 严格单调：五连压倒一切，活四强于任意数量的活三
pub mod weights {
    /// 五连（胜利哨兵）
    pub const FIVE: i32 = 1_000_000;
    /// 活四：两端均空，对方无法同时防守
    pub const OPEN_FOUR: i32 = 100_000;
    /// 冲四：仅一端可成五
    pub const SIMPLE_FOUR: i32 = 12_000;
    /// 跳四：带一个空隙的四，补隙即成五
    pub const BROKEN_FOUR: i32 = 10_000;
    /// 活三：不应对即成活四
    pub const OPEN_THREE: i32 = 5_000;
    /// 跳三：带空隙、两端可用的三
    pub const BROKEN_THREE: i32 = 1_500;
    /// 眠三：一端封死
    pub const CLOSED_THREE: i32 = 500;
    /// 活二
    pub const OPEN_TWO: i32 = 400;
    /// 眠二
    pub const CLOSED_TWO: i32 = 50;
    /// 同点多向威胁加成
    pub const DOUBLE_THREAT: i32 = 2_000;
}

/// 一条方向线上经过某点的连珠形状
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRun {
    /// 连珠棋子数（跨越至多一个空隙）
    pub len: u32,
    /// 空隙数（0 或 1）
    pub gaps: u32,
    /// 仍可延伸成五的开放端数（0-2）
    pub open_ends: u32,
}

impl LineRun {
    /// 是否已成五
    pub fn is_five(&self) -> bool {
        self.len >= WIN_LENGTH as u32 && self.gaps == 0
    }

    /// 是否为两端均空的活四
    pub fn is_open_four(&self) -> bool {
        self.len == 4 && self.gaps == 0 && self.open_ends == 2
    }

    /// 是否构成对方必须应对的威胁（四类或活三类）
    pub fn is_forcing(&self) -> bool {
        match (self.len, self.gaps, self.open_ends) {
            (l, 0, _) if l >= WIN_LENGTH as u32 => true,
            (l, 1, _) if l >= 4 => true,
            (4, 0, e) if e > 0 => true,
            (3, 0, 2) => true,
            (3, 1, 2) => true,
            _ => false,
        }
    }

    /// 形状分值
    pub fn score(&self) -> i32 {
        match (self.len, self.gaps, self.open_ends) {
            (l, 0, _) if l >= 5 => weights::FIVE,
            // 带空隙的"五"实际是补一手即胜的四类威胁
            (l, _, _) if l >= 5 => weights::BROKEN_FOUR,
            (4, 0, 2) => weights::OPEN_FOUR,
            (4, 0, 1) => weights::SIMPLE_FOUR,
            (4, 1, _) => weights::BROKEN_FOUR,
            (3, 0, 2) => weights::OPEN_THREE,
            (3, 1, 2) => weights::BROKEN_THREE,
            (3, 0, 1) => weights::CLOSED_THREE,
            (3, 1, 1) => weights::CLOSED_THREE,
            (2, 0, 2) => weights::OPEN_TWO,
            (2, _, 1) => weights::CLOSED_TWO,
            _ => 0,
        }
    }
}

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 整盘评估，从 for_player 视角给分
    ///
    /// 反对称：evaluate(b, p) == -evaluate(b, p.opponent())
    pub fn evaluate(board: &Board, for_player: Player) -> i32 {
        Self::side_score(board, for_player) - Self::side_score(board, for_player.opponent())
    }

    /// 以 pos 为中心的四线局部评分，pos 上须已有 player 的棋子
    ///
    /// 用于候选着法排序和最后一手的增量打分
    pub fn score_point(board: &Board, pos: Pos, player: Player) -> i32 {
        let mut total = 0i32;
        let mut forcing = 0i32;
        for dir in DIRS {
            let run = Self::line_run(board, pos, player, dir);
            if run.is_five() {
                return weights::FIVE;
            }
            total += run.score();
            if run.is_forcing() {
                forcing += 1;
            }
        }
        // 双向威胁无法同时防守，价值远超单线之和
        if forcing >= 2 {
            total += weights::DOUBLE_THREAT * forcing;
        }
        total
    }

    /// 单方所有连珠形状的分值和，每条连珠只在其起点统计一次
    fn side_score(board: &Board, player: Player) -> i32 {
        let mut total = 0i32;
        for (pos, p) in board.stones_iter() {
            if p != player {
                continue;
            }
            for (dr, dc) in DIRS {
                // 前一格仍是己方棋子则此处不是连珠起点
                if board.cell(pos.row as i32 - dr, pos.col as i32 - dc) == Some(Some(player)) {
                    continue;
                }
                total += Self::scan(board, pos, player, (dr, dc), false, [1, -1]).score();
            }
        }
        total
    }

    /// 某方向上经过 pos 的最优形状
    ///
    /// 空隙从哪一端使用会产生不同结果，连续扫描与两个方向的
    /// 跳跃扫描各算一次，取分值最高者
    pub fn line_run(board: &Board, pos: Pos, player: Player, dir: (i32, i32)) -> LineRun {
        let solid = Self::scan(board, pos, player, dir, false, [1, -1]);
        let fwd = Self::scan(board, pos, player, dir, true, [1, -1]);
        let rev = Self::scan(board, pos, player, dir, true, [-1, 1]);

        let mut best = solid;
        if fwd.score() > best.score() {
            best = fwd;
        }
        if rev.score() > best.score() {
            best = rev;
        }
        best
    }

    /// 沿 dir 双向扫描经过 pos 的连珠
    ///
    /// allow_gap 允许跨越一个空隙（其后紧跟己方棋子时）；
    /// signs 决定先扫哪一端，空隙额度偏向先扫的一端
    fn scan(
        board: &Board,
        pos: Pos,
        player: Player,
        dir: (i32, i32),
        allow_gap: bool,
        signs: [i32; 2],
    ) -> LineRun {
        let (dr, dc) = dir;
        let mut len = 1u32;
        let mut gaps = 0u32;
        let mut open_ends = 0u32;
        let mut room = 0u32;
        let mut gap_budget = if allow_gap { 1u32 } else { 0 };

        for sign in signs {
            let mut r = pos.row as i32 + dr * sign;
            let mut c = pos.col as i32 + dc * sign;
            loop {
                match board.cell(r, c) {
                    Some(Some(p)) if p == player => len += 1,
                    Some(None) => {
                        if gap_budget > 0
                            && board.cell(r + dr * sign, c + dc * sign) == Some(Some(player))
                        {
                            // 跨过空隙继续延伸
                            gap_budget -= 1;
                            gaps += 1;
                        } else {
                            open_ends += 1;
                            // 统计该端剩余的发展空间
                            let mut rr = r;
                            let mut cc = c;
                            while room < WIN_LENGTH as u32 && board.cell(rr, cc) == Some(None) {
                                room += 1;
                                rr += dr * sign;
                                cc += dc * sign;
                            }
                            break;
                        }
                    }
                    // 边界或对方棋子：此端封死
                    _ => break,
                }
                r += dr * sign;
                c += dc * sign;
            }
        }

        // 连同两端空间都凑不满五连的形状没有发展价值
        if len + gaps + room < WIN_LENGTH as u32 {
            open_ends = 0;
        }
        LineRun {
            len,
            gaps,
            open_ends,
        }
    }
}
