//! 电脑玩家
//!
//! 引擎自带两种 [`DecisionProvider`]：按手牌强度谨慎出牌的 [`HeuristicPlayer`]，
//! 以及在合法回答中均匀随机选择的 [`RandomPlayer`]（主要用于长时间测试）。

use crate::card::{Card, Ranking};
use crate::decision::{CardChoice, DecisionProvider, WagerResponse};
use crate::error::DecisionError;
use crate::state::TableView;
use crate::wager::MAX_STAKE;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 手牌强度：牌力之和，每张 manilha 另加分
pub fn hand_strength(ranking: &Ranking, view: &TableView) -> u32 {
    view.hand
        .iter()
        .map(|c| {
            let bonus = if c.rank == view.trump_rank { 5 } else { 0 };
            u32::from(ranking.power(c, view.trump_rank)) + bonus
        })
        .sum()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPlayer {
    ranking: Ranking,
}

impl HeuristicPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ranking(ranking: Ranking) -> Self {
        HeuristicPlayer { ranking }
    }

    /// 桌上最大的牌是队友的且无人打平
    fn partner_winning(&self, view: &TableView) -> bool {
        let best = view.table_best(&self.ranking);
        let mut top = view
            .table
            .iter()
            .filter(|t| t.card.is_some_and(|c| self.ranking.power(&c, view.trump_rank) == best));
        match (top.next(), top.next()) {
            (Some(t), None) => t.team == view.team && best > 0,
            _ => false,
        }
    }
}

impl DecisionProvider for HeuristicPlayer {
    fn choose_card(&mut self, hand: &[Card], table: &TableView) -> Result<CardChoice, DecisionError> {
        let trump = table.trump_rank;
        let weakest = self
            .ranking
            .weakest(hand, trump)
            .ok_or_else(|| DecisionError::Internal("no cards in hand".into()))?;

        // 首家出最小的牌
        if table.table.is_empty() {
            return Ok(CardChoice::open(weakest));
        }
        if self.partner_winning(table) {
            return Ok(CardChoice { index: weakest, conceal: table.can_conceal() });
        }

        let best = table.table_best(&self.ranking);
        let cheapest_winner = hand
            .iter()
            .enumerate()
            .filter(|(_, c)| self.ranking.power(c, trump) > best)
            .min_by_key(|(_, c)| self.ranking.power(c, trump))
            .map(|(i, _)| i);

        Ok(match cheapest_winner {
            Some(index) => CardChoice::open(index),
            // 赢不了：垫最小的牌，允许时扣下
            None => CardChoice { index: weakest, conceal: table.can_conceal() },
        })
    }

    fn respond_to_wager(
        &mut self,
        _current: u8,
        proposed: u8,
        table: &TableView,
    ) -> Result<WagerResponse, DecisionError> {
        let strength = hand_strength(&self.ranking, table);
        Ok(if strength > 30 && proposed < MAX_STAKE {
            WagerResponse::Raise
        } else if strength > 20 {
            WagerResponse::Accept
        } else if proposed >= 9 && strength < 15 {
            WagerResponse::Decline
        } else {
            WagerResponse::Accept
        })
    }

    fn wants_to_call(&mut self, table: &TableView) -> Result<bool, DecisionError> {
        let strength = hand_strength(&self.ranking, table);
        Ok(strength > 25
            || (table.trick_number == 1 && strength > 20)
            || (table.tally.played() > 0 && strength > 15))
    }
}

/// 随机玩家，给定种子时可复现
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    rng: StdRng,
    call_rate: f64,
}

impl RandomPlayer {
    /// `Some(seed)` 可复现，`None` 使用系统熵
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        RandomPlayer { rng, call_rate: 0.15 }
    }
}

impl DecisionProvider for RandomPlayer {
    fn choose_card(&mut self, hand: &[Card], table: &TableView) -> Result<CardChoice, DecisionError> {
        if hand.is_empty() {
            return Err(DecisionError::Internal("no cards in hand".into()));
        }
        let index = self.rng.random_range(0..hand.len());
        let conceal = table.can_conceal() && self.rng.random_bool(0.1);
        Ok(CardChoice { index, conceal })
    }

    fn respond_to_wager(
        &mut self,
        _current: u8,
        proposed: u8,
        _table: &TableView,
    ) -> Result<WagerResponse, DecisionError> {
        let options: &[WagerResponse] = if proposed < MAX_STAKE {
            &[WagerResponse::Accept, WagerResponse::Decline, WagerResponse::Raise]
        } else {
            &[WagerResponse::Accept, WagerResponse::Decline]
        };
        Ok(options[self.rng.random_range(0..options.len())])
    }

    fn wants_to_call(&mut self, _table: &TableView) -> Result<bool, DecisionError> {
        Ok(self.rng.random_bool(self.call_rate))
    }
}
