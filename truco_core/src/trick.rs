use crate::card::{Card, Rank, Ranking};
use crate::state::{Seat, Team};
use serde::{Deserialize, Serialize};

pub const TRICKS_PER_HAND: u8 = 3;
pub const TRICKS_TO_WIN: u8 = 2;

/// 一次出牌：桌上的一张牌以及出牌的座位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub seat: Seat,
    pub team: Team,
    pub card: Card,
}

impl Ranking {
    /// 判定本墩赢家，平墩 (melou) 返回 `None`。
    /// 只比较牌力，出牌顺序不参与破平。
    pub fn resolve_trick(&self, plays: &[Play], trump: Rank) -> Option<Seat> {
        let best = plays.iter().map(|p| self.power(&p.card, trump)).max()?;
        let mut top = plays.iter().filter(|p| self.power(&p.card, trump) == best);
        match (top.next(), top.next()) {
            (Some(winner), None) => Some(winner.seat),
            // 最大牌不止一张：平墩，不论属于哪一队
            _ => None,
        }
    }
}

/// 使用标准牌力表的 [`Ranking::resolve_trick`]
pub fn resolve_trick(plays: &[Play], trump: Rank) -> Option<Seat> {
    Ranking::STANDARD.resolve_trick(plays, trump)
}

/// 按已打的墩数判断这手牌的进展
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrickVerdict {
    Pending,
    Won(Team),
    /// 双方持平 (empatou)，不计分
    Tied,
}

/// 本手牌各队赢墩数
///
/// 平墩同时计入两队，所以打满三墩后积分多的一方就是净胜墩多的一方。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickTally {
    pub team_one: u8,
    pub team_two: u8,
    pub draws: u8,
}

impl TrickTally {
    pub fn record(&mut self, winner: Option<Team>) {
        match winner {
            Some(Team::One) => self.team_one += 1,
            Some(Team::Two) => self.team_two += 1,
            None => self.draws += 1,
        }
    }

    pub fn wins(&self, team: Team) -> u8 {
        match team {
            Team::One => self.team_one,
            Team::Two => self.team_two,
        }
    }

    pub fn credits(&self, team: Team) -> u8 {
        self.wins(team) + self.draws
    }

    pub fn played(&self) -> u8 {
        self.team_one + self.team_two + self.draws
    }

    pub fn verdict(&self) -> TrickVerdict {
        for team in [Team::One, Team::Two] {
            if self.wins(team) >= TRICKS_TO_WIN {
                return TrickVerdict::Won(team);
            }
        }
        if self.played() < TRICKS_PER_HAND {
            return TrickVerdict::Pending;
        }
        match self.credits(Team::One).cmp(&self.credits(Team::Two)) {
            std::cmp::Ordering::Greater => TrickVerdict::Won(Team::One),
            std::cmp::Ordering::Less => TrickVerdict::Won(Team::Two),
            std::cmp::Ordering::Equal => TrickVerdict::Tied,
        }
    }
}
