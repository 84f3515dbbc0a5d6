use crate::card::Card;
use crate::state::{Seat, Team};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 核心错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrucoError {
    /// 牌堆剩余不足。40 张牌每手最多用 37 张，出现即说明不变量被破坏
    #[error("cannot draw {requested} cards, only {remaining} left in the deck")]
    InsufficientCards { requested: usize, remaining: usize },

    /// 决策方选的牌下标超出手牌范围
    #[error("seat {seat} chose card {index} but holds {hand_size}")]
    InvalidChoice { seat: Seat, index: usize, hand_size: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("expected {expected} seated players, got {got}")]
    SeatCount { expected: usize, got: usize },

    #[error("cannot parse card {0:?}")]
    ParseCard(String),

    #[error("card {0} appears more than once in the deck")]
    DuplicateCard(Card),
}

/// truco 喊叫无效的原因。不是致命错误，喊叫直接被忽略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IllegalWagerCall {
    #[error("the stake is already at its maximum")]
    AtMaximum,
    #[error("{0} raised last and must wait for the other team")]
    AwaitingResponse(Team),
    #[error("{0} is one point from winning and may not call")]
    MatchPoint(Team),
}

/// 决策方无法给出回答时返回的错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("input closed")]
    InputClosed,
    #[error("unrecognized answer: {0}")]
    Unrecognized(String),
    #[error("decision provider failed: {0}")]
    Internal(String),
}
