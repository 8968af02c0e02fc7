//! 求解演示
//!
//! 运行方式:
//! ```bash
//! cargo run -p gomoku-ai --example solve_demo
//! ```

use gomoku_core::BoardCodec;
use gomoku_ai::{solve, AlgoType};

fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // 中盘局面：黑方刚走出活三
    let input = "
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . o . . . . . . .
        . . . . . . + o . . . . . . .
        . . . . . . + o . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
        . . . . . . . . . . . . . . .
    ";

    let board = BoardCodec::decode(input, 15, 15)?;
    println!("{}", board);

    for algo in [
        AlgoType::Minimax,
        AlgoType::AlphaBeta,
        AlgoType::IterativeDeepening,
        AlgoType::MonteCarlo,
    ] {
        let name = match algo {
            AlgoType::Minimax => "minimax",
            AlgoType::AlphaBeta => "alphabeta",
            AlgoType::IterativeDeepening => "iterative",
            AlgoType::MonteCarlo => "monte_carlo",
        };
        let report = solve(input, name, 15, 15, None)?;
        println!("{}: {}", name, report.to_json()?);
    }

    Ok(())
}
