use crate::card::{Card, Rank};
use crate::decision::WagerResponse;
use crate::logic::HandOutcome;
use crate::state::{MatchId, Scoreboard, Seat, Team};
use crate::trick::TrickTally;
use serde::{Deserialize, Serialize};

// --- 比赛事件 ---
// 牌局推进时按顺序发出，供界面或日志使用。
// 扣下的牌不公开牌面。

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum MatchEvent {
    /// 新的一手牌开始
    HandStarted {
        match_id: MatchId,
        hand_number: u32,
        /// 第一墩的首家
        starter: Seat,
        scores: Scoreboard,
    },

    /// 翻出 vira，公布管牌点数
    TrumpRevealed { indicator: Card, trump_rank: Rank },

    TrickStarted { trick_number: u8, lead: Seat },

    /// 有人喊 truco（`raise` 为真时表示加注）
    WagerCalled { seat: Seat, team: Team, from: u8, to: u8, raise: bool },

    WagerAnswered { seat: Seat, team: Team, response: WagerResponse, value: u8 },

    CardPlayed {
        seat: Seat,
        team: Team,
        /// 扣牌时为 `None`
        card: Option<Card>,
    },

    /// 决定无效，已重新询问或被替换
    ChoiceRejected { seat: Seat, reason: String },

    TrickResolved {
        trick_number: u8,
        /// 平墩时为 `None`
        winner: Option<Seat>,
        winning_team: Option<Team>,
        tally: TrickTally,
    },

    HandSettled { hand_number: u32, outcome: HandOutcome, scores: Scoreboard },

    MatchOver { match_id: MatchId, winner: Team, scores: Scoreboard, hands_played: u32 },
}

/// 按发生顺序接收所有事件
pub trait EventSink {
    fn publish(&mut self, event: MatchEvent);
}

/// 收集事件，便于测试和事后回放
impl EventSink for Vec<MatchEvent> {
    fn publish(&mut self, event: MatchEvent) {
        self.push(event);
    }
}

/// 丢弃事件
impl EventSink for () {
    fn publish(&mut self, _event: MatchEvent) {}
}
