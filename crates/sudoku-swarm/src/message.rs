use serde::{Deserialize, Serialize};
use sudoku_board::Board;

/// Width of a freshly submitted path, and the meaning of an absent
/// `parallelBranches` field on the wire.
pub const DEFAULT_BRANCH_WIDTH: u32 = 1;

/// One suspended node of a depth-first path: a board plus the number of
/// sibling paths its lineage has already been split into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// The board to examine when this frame reaches the top of the stack
    pub board: Board,
    /// Branch width; omitted on the wire for the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_branches: Option<u32>,
}

impl Frame {
    /// A frame at the default width.
    pub fn new(board: Board) -> Self {
        Self {
            board,
            parallel_branches: None,
        }
    }

    /// A frame at an explicit width.
    pub fn with_width(board: Board, width: u32) -> Self {
        Self {
            board,
            parallel_branches: Some(width),
        }
    }

    /// Effective width of this frame.
    pub fn width(&self) -> u32 {
        self.parallel_branches.unwrap_or(DEFAULT_BRANCH_WIDTH)
    }
}

/// The unit of work carried by the queue: one solve request id plus one open
/// depth-first path. The last frame is the top of the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMessage {
    pub solve_request_id: String,
    pub stack: Vec<Frame>,
}

impl SearchMessage {
    /// A single-frame message rooting a new path.
    pub fn rooted(solve_request_id: impl Into<String>, frame: Frame) -> Self {
        Self {
            solve_request_id: solve_request_id.into(),
            stack: vec![frame],
        }
    }

    /// Encode to the JSON wire form.
    pub fn encode(&self) -> Vec<u8> {
        // Serialization of a well-formed message cannot fail
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Decode from the JSON wire form. `None` for unparseable payloads,
    /// empty request ids, or empty stacks — all unrecoverable.
    pub fn decode(payload: &[u8]) -> Option<SearchMessage> {
        let msg: SearchMessage = serde_json::from_slice(payload).ok()?;
        if msg.solve_request_id.is_empty() || msg.stack.is_empty() {
            return None;
        }
        Some(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str =
        "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";

    fn board() -> Board {
        Board::from_string(PUZZLE).unwrap()
    }

    #[test]
    fn test_round_trip_preserves_widths() {
        let msg = SearchMessage {
            solve_request_id: "req-1".to_string(),
            stack: vec![
                Frame::new(board()),
                Frame::with_width(board(), 6),
            ],
        };
        let back = SearchMessage::decode(&msg.encode()).unwrap();
        assert_eq!(back, msg);
        assert_eq!(back.stack[0].parallel_branches, None);
        assert_eq!(back.stack[0].width(), DEFAULT_BRANCH_WIDTH);
        assert_eq!(back.stack[1].width(), 6);
    }

    #[test]
    fn test_wire_field_names() {
        let msg = SearchMessage::rooted("req-1", Frame::with_width(board(), 3));
        let json: serde_json::Value = serde_json::from_slice(&msg.encode()).unwrap();
        assert_eq!(json["solveRequestId"], "req-1");
        assert_eq!(json["stack"][0]["parallelBranches"], 3);
        assert_eq!(
            json["stack"][0]["board"].as_str().unwrap().len(),
            sudoku_board::CELL_COUNT
        );
    }

    #[test]
    fn test_absent_width_omitted_on_wire() {
        let msg = SearchMessage::rooted("req-1", Frame::new(board()));
        let json: serde_json::Value = serde_json::from_slice(&msg.encode()).unwrap();
        assert!(json["stack"][0].get("parallelBranches").is_none());
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(SearchMessage::decode(b"not json").is_none());
        assert!(SearchMessage::decode(br#"{"solveRequestId":"","stack":[]}"#).is_none());
        let no_frames = SearchMessage {
            solve_request_id: "req-1".to_string(),
            stack: Vec::new(),
        };
        assert!(SearchMessage::decode(&no_frames.encode()).is_none());
    }
}
