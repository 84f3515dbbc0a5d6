//! 加注 (truco) 协商
//!
//! 一手牌的赌注按 1 → 3 → 6 → 9 → 12 上升。一方提出下一档，另一方接受、拒绝或加注。
//! 加注等于接受当前提议并立刻提出再下一档，双方角色互换。
//! 牌局流程用循环调用 [`Wager::respond`] 推进，连续加注不会加深调用栈。

use crate::decision::WagerResponse;
use crate::error::IllegalWagerCall;
use crate::state::Team;
use serde::{Deserialize, Serialize};

/// 所有可能的赌注档位，按顺序
pub const STAKES: [u8; 5] = [1, 3, 6, 9, 12];

pub const BASE_STAKE: u8 = STAKES[0];
pub const MAX_STAKE: u8 = STAKES[STAKES.len() - 1];

/// `value` 的下一档，如果有
pub fn next_stake(value: u8) -> Option<u8> {
    let idx = STAKES.iter().position(|&v| v == value)?;
    STAKES.get(idx + 1).copied()
}

/// 等待回应的 truco 喊叫
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub caller: Team,
    /// 喊叫前的赌注；对方拒绝时喊叫方得到的分数
    pub from: u8,
    pub to: u8,
}

/// 一次回应的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WagerStep {
    /// 按新赌注继续
    Accepted { value: u8 },
    /// 这手牌结束，被拒绝的喊叫方得到 `points`
    Declined { awarded_to: Team, points: u8 },
    /// 应答方再加一档，等待对方回应
    Raised(Proposal),
}

/// 本手牌的赌注状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wager {
    value: u8,
    last_raiser: Option<Team>,
}

impl Default for Wager {
    fn default() -> Self {
        Wager::new()
    }
}

impl Wager {
    pub fn new() -> Wager {
        Wager { value: BASE_STAKE, last_raiser: None }
    }

    /// 这手牌当前的分值
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn last_raiser(&self) -> Option<Team> {
        self.last_raiser
    }

    pub fn is_maxed(&self) -> bool {
        next_stake(self.value).is_none()
    }

    /// 检查 `team` 现在能否喊叫，可以则返回将提出的赌注
    pub fn check_call(&self, team: Team) -> Result<u8, IllegalWagerCall> {
        let Some(to) = next_stake(self.value) else {
            return Err(IllegalWagerCall::AtMaximum);
        };
        if self.last_raiser == Some(team) {
            return Err(IllegalWagerCall::AwaitingResponse(team));
        }
        Ok(to)
    }

    /// `caller` 发起喊叫，得到回应前状态不变
    pub fn call(&self, caller: Team) -> Result<Proposal, IllegalWagerCall> {
        let to = self.check_call(caller)?;
        Ok(Proposal { caller, from: self.value, to })
    }

    /// 把应答方的回应应用到 `proposal`
    pub fn respond(&mut self, proposal: Proposal, response: WagerResponse) -> WagerStep {
        match response {
            WagerResponse::Accept => {
                self.value = proposal.to;
                self.last_raiser = Some(proposal.caller);
                WagerStep::Accepted { value: self.value }
            }
            WagerResponse::Decline => WagerStep::Declined {
                awarded_to: proposal.caller,
                points: proposal.from,
            },
            WagerResponse::Raise => {
                let responder = proposal.caller.opponent();
                self.value = proposal.to;
                self.last_raiser = Some(responder);
                match next_stake(proposal.to) {
                    Some(to) => WagerStep::Raised(Proposal { caller: responder, from: proposal.to, to }),
                    // 已是最高档，加注按接受处理
                    None => WagerStep::Accepted { value: self.value },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stake_ladder() {
        assert_eq!(next_stake(1), Some(3));
        assert_eq!(next_stake(3), Some(6));
        assert_eq!(next_stake(6), Some(9));
        assert_eq!(next_stake(9), Some(12));
        assert_eq!(next_stake(12), None);
        assert_eq!(next_stake(4), None);
    }

    #[test]
    fn test_accept_moves_stake() {
        let mut wager = Wager::new();
        let proposal = wager.call(Team::One).unwrap();
        assert_eq!(proposal, Proposal { caller: Team::One, from: 1, to: 3 });
        assert_eq!(wager.value(), 1);
        assert_eq!(wager.respond(proposal, WagerResponse::Accept), WagerStep::Accepted { value: 3 });
        assert_eq!(wager.value(), 3);
        assert_eq!(wager.last_raiser(), Some(Team::One));
    }

    #[test]
    fn test_decline_awards_pre_call_value() {
        let mut wager = Wager::new();
        let proposal = wager.call(Team::One).unwrap();
        assert_eq!(
            wager.respond(proposal, WagerResponse::Decline),
            WagerStep::Declined { awarded_to: Team::One, points: 1 }
        );
        assert_eq!(wager.value(), 1);
    }

    #[test]
    fn test_team_cannot_raise_twice_in_a_row() {
        let mut wager = Wager::new();
        let proposal = wager.call(Team::Two).unwrap();
        wager.respond(proposal, WagerResponse::Accept);
        assert_eq!(wager.call(Team::Two), Err(IllegalWagerCall::AwaitingResponse(Team::Two)));
        let proposal = wager.call(Team::One).unwrap();
        assert_eq!(proposal.to, 6);
    }

    #[test]
    fn test_raise_swaps_roles() {
        let mut wager = Wager::new();
        let proposal = wager.call(Team::One).unwrap();
        let step = wager.respond(proposal, WagerResponse::Raise);
        assert_eq!(step, WagerStep::Raised(Proposal { caller: Team::Two, from: 3, to: 6 }));
        assert_eq!(wager.value(), 3);
        assert_eq!(wager.last_raiser(), Some(Team::Two));

        // Team One 拒绝加注：Team Two 拿走已经接受的 3 分
        let WagerStep::Raised(counter) = step else { unreachable!() };
        assert_eq!(
            wager.respond(counter, WagerResponse::Decline),
            WagerStep::Declined { awarded_to: Team::Two, points: 3 }
        );
    }

    #[test]
    fn test_raise_chain_reaches_twelve() {
        let mut wager = Wager::new();
        let mut proposal = wager.call(Team::One).unwrap();
        let mut seen = vec![wager.value()];
        loop {
            match wager.respond(proposal, WagerResponse::Raise) {
                WagerStep::Raised(next) => {
                    seen.push(wager.value());
                    proposal = next;
                }
                WagerStep::Accepted { value } => {
                    seen.push(value);
                    break;
                }
                WagerStep::Declined { .. } => unreachable!(),
            }
        }
        assert_eq!(seen, vec![1, 3, 6, 9, 12]);
        assert!(wager.is_maxed());
        assert_eq!(wager.call(Team::One), Err(IllegalWagerCall::AtMaximum));
        assert_eq!(wager.call(Team::Two), Err(IllegalWagerCall::AtMaximum));
    }
}
