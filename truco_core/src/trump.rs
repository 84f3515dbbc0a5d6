use crate::card::{Card, Rank, Ranking};
use serde::{Deserialize, Serialize};

/// 本手牌的管牌 (manilhas) 信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trump {
    /// 翻开的 vira
    pub indicator: Card,
    /// vira 之后的下一个点数
    pub rank: Rank,
    /// 每个花色一张管牌，从小到大
    pub manilhas: [Card; 4],
}

impl Ranking {
    /// 根据 vira 算出本手牌的管牌点数
    pub fn resolve_trump(&self, indicator: Card) -> Trump {
        let rank = self.successor(indicator.rank);
        let manilhas = (*self.suits()).map(|suit| Card { is_trump: true, ..Card::new(rank, suit) });
        Trump { indicator, rank, manilhas }
    }
}

/// 使用标准牌力表的 [`Ranking::resolve_trump`]
pub fn resolve_trump(indicator: Card) -> Trump {
    Ranking::STANDARD.resolve_trump(indicator)
}

impl Trump {
    pub fn is_manilha(&self, card: &Card) -> bool {
        card.rank == self.rank
    }
}

/// 标记 `cards` 中的管牌，同时清除上一手残留的标记
pub fn mark_trumps(cards: &mut [Card], trump: &Trump) {
    for card in cards {
        card.is_trump = trump.is_manilha(card);
    }
}
