//! Collision detection over movement segments.
//!
//! An agent's movement segment runs from its current cell to the head of
//! its path: a lookahead over the whole current leg, not just the next
//! unit step. Two agents collide when their segments intersect, endpoint
//! contact and collinear overlap included. Idle agents have no segment
//! and never collide.
//!
//! Detection pauses both agents of every colliding pair as it goes. This
//! is eager and pessimistic: nobody checks whether the agents would
//! actually meet at the same time. The arbitration strategies decide who
//! gets to move again.
//!
//! The pairwise scan is quadratic in the number of non-idle agents, which
//! is fine for fleets of tens of robots.

use std::cmp::Ordering;

use gridfleet_types::{Agent, AgentId, GridPos};
use serde::Serialize;
use tracing::debug;

/// A closed line segment between two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Where the segment starts.
    pub start: GridPos,
    /// Where the segment ends.
    pub end: GridPos,
}

impl Segment {
    /// Create a segment between two cells.
    pub const fn new(start: GridPos, end: GridPos) -> Self {
        Self { start, end }
    }

    /// The agent's current leg, from its position to its path head.
    pub fn of_agent(agent: &Agent) -> Option<Self> {
        agent
            .path_head()
            .map(|head| Self::new(agent.position, head.pos()))
    }
}

/// Two distinct agents whose movement segments intersect.
///
/// Each unordered pair is reported once, with `first` earlier than
/// `second` in fleet order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CollisionPair {
    /// The agent earlier in fleet order.
    pub first: AgentId,
    /// The agent later in fleet order.
    pub second: AgentId,
}

impl CollisionPair {
    /// Whether `id` is one of the two agents.
    pub fn involves(&self, id: &AgentId) -> bool {
        self.first == *id || self.second == *id
    }
}

impl core::fmt::Display for CollisionPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} & {}", self.first, self.second)
    }
}

/// Turn direction of `p -> q -> r`: `Greater` clockwise, `Less`
/// counter-clockwise, `Equal` collinear.
fn orientation(p: GridPos, q: GridPos, r: GridPos) -> Ordering {
    let (px, py) = (i128::from(p.x), i128::from(p.y));
    let (qx, qy) = (i128::from(q.x), i128::from(q.y));
    let (rx, ry) = (i128::from(r.x), i128::from(r.y));

    let lhs = qy.saturating_sub(py).saturating_mul(rx.saturating_sub(qx));
    let rhs = qx.saturating_sub(px).saturating_mul(ry.saturating_sub(qy));
    lhs.cmp(&rhs)
}

/// Whether `q` lies inside the bounding box of `p` and `r`. Only
/// meaningful when the three points are collinear.
fn within_box(p: GridPos, q: GridPos, r: GridPos) -> bool {
    q.x >= p.x.min(r.x) && q.x <= p.x.max(r.x) && q.y >= p.y.min(r.y) && q.y <= p.y.max(r.y)
}

/// Whether two closed segments share at least one point.
///
/// Uses exact integer orientation tests, so touching endpoints and
/// collinear overlaps count. A zero-length segment behaves as a point.
pub fn segments_intersect(a: Segment, b: Segment) -> bool {
    let o1 = orientation(a.start, a.end, b.start);
    let o2 = orientation(a.start, a.end, b.end);
    let o3 = orientation(b.start, b.end, a.start);
    let o4 = orientation(b.start, b.end, a.end);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Ordering::Equal && within_box(a.start, b.start, a.end))
        || (o2 == Ordering::Equal && within_box(a.start, b.end, a.end))
        || (o3 == Ordering::Equal && within_box(b.start, a.start, b.end))
        || (o4 == Ordering::Equal && within_box(b.start, a.end, b.end))
}

/// Find every colliding pair in the fleet and pause both members.
///
/// Pairs are scanned in fleet order (`i < j`). Agents that are already
/// paused still take part: a paused agent's leg is still where it intends
/// to go.
pub fn detect_collisions(agents: &mut [Agent]) -> Vec<CollisionPair> {
    let segments: Vec<Option<Segment>> = agents.iter().map(Segment::of_agent).collect();

    let mut hits: Vec<(usize, usize)> = Vec::new();
    for (i, seg_i) in segments.iter().enumerate() {
        let Some(seg_i) = seg_i else {
            continue;
        };
        for (j, seg_j) in segments.iter().enumerate().skip(i.saturating_add(1)) {
            let Some(seg_j) = seg_j else {
                continue;
            };
            if segments_intersect(*seg_i, *seg_j) {
                hits.push((i, j));
            }
        }
    }

    let mut pairs = Vec::with_capacity(hits.len());
    for (i, j) in hits {
        let first = agents.get_mut(i).map(|a| {
            a.paused = true;
            a.id.clone()
        });
        let second = agents.get_mut(j).map(|a| {
            a.paused = true;
            a.id.clone()
        });
        if let (Some(first), Some(second)) = (first, second) {
            debug!(%first, %second, "movement segments intersect");
            pairs.push(CollisionPair { first, second });
        }
    }

    pairs
}
