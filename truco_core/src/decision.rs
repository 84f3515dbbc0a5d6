use crate::card::Card;
use crate::error::DecisionError;
use crate::state::TableView;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 对 truco 的回应: sim / não / aumentar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WagerResponse {
    Accept,
    Decline,
    Raise,
}

impl fmt::Display for WagerResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            WagerResponse::Accept => "sim",
            WagerResponse::Decline => "não",
            WagerResponse::Raise => "aumentar",
        })
    }
}

/// 出哪张牌，以及是否扣下
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardChoice {
    /// 手牌中的下标，从 0 开始
    pub index: usize,
    /// 仅从第二墩起生效
    pub conceal: bool,
}

impl CardChoice {
    pub fn open(index: usize) -> CardChoice {
        CardChoice { index, conceal: false }
    }

    pub fn concealed(index: usize) -> CardChoice {
        CardChoice { index, conceal: true }
    }
}

/// 座位的决策来源：终端前的玩家、电脑策略或测试脚本。
///
/// 牌局流程只通过这个 trait 交互，每次调用阻塞到拿到回答为止。
/// 回答由调用方校验：越界的出牌会重新询问并最终被替换，
/// [`respond_to_wager`](DecisionProvider::respond_to_wager) 返回错误视为拒绝。
pub trait DecisionProvider {
    fn choose_card(&mut self, hand: &[Card], table: &TableView) -> Result<CardChoice, DecisionError>;

    fn respond_to_wager(
        &mut self,
        current: u8,
        proposed: u8,
        table: &TableView,
    ) -> Result<WagerResponse, DecisionError>;

    /// 只在该座位所在队伍可以喊叫时询问
    fn wants_to_call(&mut self, table: &TableView) -> Result<bool, DecisionError>;
}
