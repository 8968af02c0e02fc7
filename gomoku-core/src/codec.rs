//! 位置编码串的解析与生成
//!
//! 编码格式：按行优先，每格一个字符，'0' 空、'1' 黑、'2' 白。
//! 兼容手绘文本棋盘的 '.'/'o'/'+' 写法，空白字符一律忽略。
//!
//! 示例（5x5）：
//! `0000000100001200000000000`

use crate::board::Board;
use crate::error::{GomokuError, Result};
use crate::player::{Player, Pos};

/// 棋盘编码处理
pub struct BoardCodec;

impl BoardCodec {
    /// 解析位置编码串为棋盘
    ///
    /// 尺寸校验先于任何解析；串长（忽略空白后）必须等于 width*height，
    /// 否则返回 MalformedInput 且不构造任何部分棋盘
    pub fn decode(input: &str, width: usize, height: usize) -> Result<Board> {
        let mut board = Board::new(width, height)?;
        let total = width * height;
        let mut count = 0usize;

        for c in input.chars() {
            if c.is_whitespace() {
                continue;
            }
            if count >= total {
                return Err(GomokuError::MalformedInput {
                    reason: format!("expected {} cells, got more", total),
                });
            }
            let cell = match c {
                '0' | '.' => None,
                other => match Player::from_char(other) {
                    Some(player) => Some(player),
                    None => {
                        return Err(GomokuError::MalformedInput {
                            reason: format!("invalid cell character: {:?}", other),
                        });
                    }
                },
            };
            if let Some(player) = cell {
                board.place(Pos::new(count / width, count % width), player)?;
            }
            count += 1;
        }

        if count != total {
            return Err(GomokuError::MalformedInput {
                reason: format!("expected {} cells, got {}", total, count),
            });
        }
        Ok(board)
    }

    /// 按方形棋盘解析，从串长推断边长
    ///
    /// 旧式入口，通用的 decode 完全覆盖它
    pub fn decode_square(input: &str) -> Result<Board> {
        let len = input.chars().filter(|c| !c.is_whitespace()).count();
        let side = (len as f64).sqrt() as usize;
        if side * side != len {
            return Err(GomokuError::MalformedInput {
                reason: format!("length {} is not a perfect square", len),
            });
        }
        Self::decode(input, side, side)
    }

    /// 将棋盘编码为位置串
    pub fn encode(board: &Board) -> String {
        let mut out = String::with_capacity(board.width() * board.height());
        for row in 0..board.height() {
            for col in 0..board.width() {
                match board.get(Pos::new(row, col)) {
                    Some(player) => out.push(player.to_char()),
                    None => out.push('0'),
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_basic() {
        let board = BoardCodec::decode("000112000112", 6, 2).unwrap();
        assert_eq!(board.get(Pos::new(0, 0)), None);
        assert_eq!(board.get(Pos::new(1, 4)), Some(Player::Black));
        assert_eq!(board.get(Pos::new(1, 5)), Some(Player::White));
        assert_eq!(board.stone_count(), 6);
    }

    #[test]
    fn test_decode_ignores_whitespace() {
        let board = BoardCodec::decode("10000 01000 00100 00010 00001", 5, 5).unwrap();
        for i in 0..5 {
            assert_eq!(board.get(Pos::new(i, i)), Some(Player::Black));
        }
    }

    #[test]
    fn test_decode_ascii_art() {
        // 手绘棋盘写法：'.' 空、'o' 黑、'+' 白
        let board = BoardCodec::decode(
            "
            . . . . .
            . o + . .
            . . o . .
            . . . . .
            . . . . .
            ",
            5,
            5,
        )
        .unwrap();
        assert_eq!(board.get(Pos::new(1, 1)), Some(Player::Black));
        assert_eq!(board.get(Pos::new(1, 2)), Some(Player::White));
        assert_eq!(board.get(Pos::new(2, 2)), Some(Player::Black));
    }

    #[test]
    fn test_decode_wrong_length() {
        assert!(matches!(
            BoardCodec::decode("12", 5, 5),
            Err(GomokuError::MalformedInput { .. })
        ));
        assert!(matches!(
            BoardCodec::decode(&"0".repeat(26), 5, 5),
            Err(GomokuError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_decode_invalid_character() {
        assert!(matches!(
            BoardCodec::decode(&("3".to_owned() + &"0".repeat(24)), 5, 5),
            Err(GomokuError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_decode_invalid_dimension() {
        // 尺寸错误先于串内容报告
        assert!(matches!(
            BoardCodec::decode("0000", 2, 2),
            Err(GomokuError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_decode_square() {
        let board = BoardCodec::decode_square(&"0".repeat(225)).unwrap();
        assert_eq!(board.width(), 15);
        assert_eq!(board.height(), 15);

        assert!(matches!(
            BoardCodec::decode_square("12123"),
            Err(GomokuError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_encode_roundtrip() {
        let input = "000112000112";
        let board = BoardCodec::decode(input, 6, 2).unwrap();
        assert_eq!(BoardCodec::encode(&board), input);

        let again = BoardCodec::decode(&BoardCodec::encode(&board), 6, 2).unwrap();
        assert_eq!(again, board);
    }
}
