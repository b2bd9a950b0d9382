//! Pieces and their oriented forms ("fixes")

use serde::{Deserialize, Serialize};

/// Pip value carried by one end of a piece.
pub type Value = u8;

/// Index of a piece within its [`PieceSet`].
pub type PieceId = usize;

/// Dense index of a fix, used as the node identity in the chain graph.
pub type NodeId = usize;

/// Which end of a fix a placement refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Head,
    Tail,
}

impl Role {
    /// The value this end of `fix` carries.
    pub fn value_of(self, fix: &Fix) -> Value {
        match self {
            Role::Head => fix.head,
            Role::Tail => fix.tail,
        }
    }
}

/// A tile with an unordered pair of values. A piece is a *double* when
/// both values are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub low: Value,
    pub high: Value,
}

impl Piece {
    pub fn is_double(&self) -> bool {
        self.low == self.high
    }

    /// The distinct orientations of this piece.
    ///
    /// A double has a single fix; any other piece has the two mirror
    /// fixes `(low, high)` and `(high, low)`. Symmetric duplicates
    /// collapse by content, so the result is exhaustive and minimal.
    pub fn fixes(&self) -> Vec<Fix> {
        let mut out = vec![Fix {
            piece: self.id,
            head: self.low,
            tail: self.high,
        }];
        if !self.is_double() {
            out.push(Fix {
                piece: self.id,
                head: self.high,
                tail: self.low,
            });
        }
        out
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}]", self.low, self.high)
    }
}

/// An oriented piece: `head` is the value presented to the previous tile
/// in the chain, `tail` the value offered to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fix {
    pub piece: PieceId,
    pub head: Value,
    pub tail: Value,
}

impl std::fmt::Display for Fix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.head, self.tail)
    }
}

/// The full set of pieces for one puzzle instance.
#[derive(Debug, Clone)]
pub struct PieceSet {
    pieces: Vec<Piece>,
    max_value: Value,
}

impl PieceSet {
    /// Every distinct value pair `0..=max_value`, in `(low, high)` order.
    /// For `max_value = 6` this is the standard 28-piece domino set.
    pub fn complete(max_value: Value) -> Self {
        let mut pieces = Vec::new();
        for low in 0..=max_value {
            for high in low..=max_value {
                pieces.push(Piece {
                    id: pieces.len(),
                    low,
                    high,
                });
            }
        }
        Self { pieces, max_value }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id]
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn max_value(&self) -> Value {
        self.max_value
    }

    /// Number of grid cells a full placement of this set occupies.
    pub fn cell_footprint(&self) -> usize {
        self.pieces.len() * 2
    }
}

/// All fixes of a piece set, each assigned a dense [`NodeId`].
///
/// Circuit formulations work over indexed nodes rather than arbitrary
/// keys, so the library fixes the node numbering once at build time and
/// everything downstream stores per-node data in flat vectors.
#[derive(Debug, Clone)]
pub struct FixLibrary {
    fixes: Vec<Fix>,
    by_piece: Vec<Vec<NodeId>>,
}

impl FixLibrary {
    pub fn new(set: &PieceSet) -> Self {
        let mut fixes = Vec::new();
        let mut by_piece = Vec::with_capacity(set.len());
        for piece in set.pieces() {
            let mut nodes = Vec::new();
            for fix in piece.fixes() {
                nodes.push(fixes.len());
                fixes.push(fix);
            }
            by_piece.push(nodes);
        }
        Self { fixes, by_piece }
    }

    pub fn fixes(&self) -> &[Fix] {
        &self.fixes
    }

    pub fn fix(&self, node: NodeId) -> &Fix {
        &self.fixes[node]
    }

    pub fn node_count(&self) -> usize {
        self.fixes.len()
    }

    pub fn piece_count(&self) -> usize {
        self.by_piece.len()
    }

    /// Node ids of the fixes belonging to `piece`.
    pub fn piece_nodes(&self, piece: PieceId) -> &[NodeId] {
        &self.by_piece[piece]
    }

    /// Whether `node` belongs to a piece with more than one fix.
    pub fn has_mirror(&self, node: NodeId) -> bool {
        self.by_piece[self.fixes[node].piece].len() > 1
    }
}
