use serde::{Deserialize, Serialize};

/// Zero-based position of a tip in one catalog snapshot.
pub type TipId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tip {
    pub id: TipId,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTally {
    pub tip_id: TipId,
    pub score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn delta(self) -> i64 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

impl From<bool> for Direction {
    fn from(up: bool) -> Self {
        if up { Direction::Up } else { Direction::Down }
    }
}

impl From<Direction> for bool {
    fn from(direction: Direction) -> Self {
        direction == Direction::Up
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteRequest {
    pub tip_id: TipId,
    pub direction: Direction,
}

/// Body of `POST /vote`, echoed back once the vote is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotePayload {
    #[serde(rename = "ID")]
    pub id: TipId,
    #[serde(rename = "Vote")]
    pub vote: bool,
}

impl From<VotePayload> for VoteRequest {
    fn from(payload: VotePayload) -> Self {
        Self {
            tip_id: payload.id,
            direction: payload.vote.into(),
        }
    }
}

impl From<VoteRequest> for VotePayload {
    fn from(request: VoteRequest) -> Self {
        Self {
            id: request.tip_id,
            vote: request.direction.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedTip {
    #[serde(rename = "ID")]
    pub id: TipId,
    #[serde(rename = "Tip")]
    pub text: String,
    #[serde(rename = "Votes")]
    pub score: i64,
}

impl RankedTip {
    pub fn new(tip: Tip, tally: VoteTally) -> Self {
        Self {
            id: tip.id,
            text: tip.text,
            score: tally.score,
        }
    }
}
