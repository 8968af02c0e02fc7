//! 核心常量定义

/// 获胜所需的连珠长度
pub const WIN_LENGTH: usize = 5;

/// 棋盘最小边长（至少要能容纳一条五连）
pub const MIN_BOARD_SIZE: usize = 5;

/// 默认棋盘宽度（列数）
pub const DEFAULT_BOARD_WIDTH: usize = 15;

/// 默认棋盘高度（行数）
pub const DEFAULT_BOARD_HEIGHT: usize = 15;

/// 候选点生成的切比雪夫半径（距离任一已有棋子超过此半径的空格不参与搜索）
pub const CANDIDATE_RADIUS: i32 = 2;

/// 四个扫描方向：横、竖、两条对角线
pub const DIRS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];
