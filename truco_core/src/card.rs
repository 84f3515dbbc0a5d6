use crate::error::TrucoError;
use rand::Rng;
use rand::prelude::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- 核心数据结构定义 ---

/// 花色 (Suit)
/// 声明顺序即默认的管牌大小: Ouros < Espadas < Copas < Paus
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    Ouros,   // ♦
    Espadas, // ♠
    Copas,   // ♥
    Paus,    // ♣
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Ouros, Suit::Espadas, Suit::Copas, Suit::Paus];
}

/// 点数 (Rank)
/// 没有 8、9、10。声明顺序即非管牌时的大小（从小到大），
/// 也是由 vira 推出 manilha 点数时使用的循环顺序。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Rank {
    Four,
    Five,
    Six,
    Seven,
    Queen,
    Jack,
    King,
    Ace,
    Two,
    Three,
}

impl Rank {
    pub const ALL: [Rank; 10] = [
        Rank::Four, Rank::Five, Rank::Six, Rank::Seven, Rank::Queen,
        Rank::Jack, Rank::King, Rank::Ace, Rank::Two, Rank::Three,
    ];
}

/// 单张牌 (Card)
///
/// `rank` 和 `suit` 创建后不变。两个标志在一手牌中设置：
/// 翻出 vira 后标记 `is_trump`，扣牌打出时标记 `is_concealed`。
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    #[serde(default)]
    pub is_trump: bool,
    #[serde(default)]
    pub is_concealed: bool,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit, is_trump: false, is_concealed: false }
    }

    /// 按标准牌力表计算的牌力
    pub fn power(&self, trump: Rank) -> u8 {
        Ranking::STANDARD.power(self, trump)
    }

    /// 点数和花色相同，忽略出牌时的标志
    pub fn same_face(&self, other: &Card) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }
}

// --- 牌力表 ---

/// 点数与花色的大小表
///
/// 启动时构建一次，注入到所有比较牌力的地方。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranking {
    ranks: [Rank; 10],
    suits: [Suit; 4],
    trump_floor: u8,
}

impl Ranking {
    pub const STANDARD: Ranking = Ranking {
        ranks: Rank::ALL,
        suits: Suit::ALL,
        trump_floor: 20,
    };

    /// 自定义牌力表，两个顺序都必须恰好列出每个点数/花色一次
    pub fn new(ranks: [Rank; 10], suits: [Suit; 4]) -> Result<Ranking, TrucoError> {
        if Rank::ALL.iter().any(|r| !ranks.contains(r)) {
            return Err(TrucoError::InvalidConfig("rank order must list every rank once".to_string()));
        }
        if Suit::ALL.iter().any(|s| !suits.contains(s)) {
            return Err(TrucoError::InvalidConfig("suit order must list every suit once".to_string()));
        }
        Ok(Ranking { ranks, suits, trump_floor: Ranking::STANDARD.trump_floor })
    }

    pub fn ranks(&self) -> &[Rank; 10] {
        &self.ranks
    }

    pub fn suits(&self) -> &[Suit; 4] {
        &self.suits
    }

    /// 最小的点数为 1，最大的为 10
    pub fn rank_order(&self, rank: Rank) -> u8 {
        self.ranks.iter().position(|r| *r == rank).map_or(0, |i| i as u8 + 1)
    }

    /// 1..=4，用于 manilha 之间比大小
    pub fn suit_order(&self, suit: Suit) -> u8 {
        self.suits.iter().position(|s| *s == suit).map_or(0, |i| i as u8 + 1)
    }

    /// 循环顺序中的下一个点数，最大的回到最小的
    pub fn successor(&self, rank: Rank) -> Rank {
        let idx = self.ranks.iter().position(|r| *r == rank).unwrap_or(0);
        self.ranks[(idx + 1) % self.ranks.len()]
    }

    /// 牌力：扣下的牌为 0，manilha 为 20 + 花色顺序，
    /// 其余为普通点数顺序
    pub fn power(&self, card: &Card, trump: Rank) -> u8 {
        if card.is_concealed {
            0
        } else if card.rank == trump {
            self.trump_floor + self.suit_order(card.suit)
        } else {
            self.rank_order(card.rank)
        }
    }

    /// 最小牌的下标，相同时取靠前的
    pub fn weakest(&self, cards: &[Card], trump: Rank) -> Option<usize> {
        cards
            .iter()
            .enumerate()
            .min_by_key(|(i, c)| (self.power(c, trump), *i))
            .map(|(i, _)| i)
    }
}

impl Default for Ranking {
    fn default() -> Self {
        Ranking::STANDARD
    }
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Suit::Ouros => "♦",
            Suit::Espadas => "♠",
            Suit::Copas => "♥",
            Suit::Paus => "♣",
        })
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Queen => "Q",
            Rank::Jack => "J",
            Rank::King => "K",
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_concealed {
            return write!(f, "??");
        }
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// 解析简写：点数字符加花色首字母，例如 `7P` (梅花 7)、`AE` (黑桃 A)
impl FromStr for Card {
    type Err = TrucoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(r), Some(su), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(TrucoError::ParseCard(s.to_string()));
        };
        let rank = match r.to_ascii_uppercase() {
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            'Q' => Rank::Queen,
            'J' => Rank::Jack,
            'K' => Rank::King,
            'A' => Rank::Ace,
            '2' => Rank::Two,
            '3' => Rank::Three,
            _ => return Err(TrucoError::ParseCard(s.to_string())),
        };
        let suit = match su.to_ascii_uppercase() {
            'O' => Suit::Ouros,
            'E' => Suit::Espadas,
            'C' => Suit::Copas,
            'P' => Suit::Paus,
            _ => return Err(TrucoError::ParseCard(s.to_string())),
        };
        Ok(Card::new(rank, suit))
    }
}

// --- 牌堆 ---

/// 一副 40 张的牌 (Deck)，从前端抽牌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// 所有点数 × 花色组合，按牌力表顺序，未洗牌
    pub fn new() -> Deck {
        Deck::with_ranking(&Ranking::STANDARD)
    }

    pub fn with_ranking(ranking: &Ranking) -> Deck {
        let mut cards = Vec::with_capacity(40);
        for &rank in ranking.ranks() {
            for &suit in ranking.suits() {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards }
    }

    /// 按给定顺序组成牌堆，用于重放或预设发牌。同一张牌出现两次时报错。
    pub fn from_cards(cards: Vec<Card>) -> Result<Deck, TrucoError> {
        for (i, card) in cards.iter().enumerate() {
            if cards[..i].iter().any(|c| c.same_face(card)) {
                return Err(TrucoError::DuplicateCard(*card));
            }
        }
        Ok(Deck { cards })
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// 取出最前面的 `n` 张牌
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>, TrucoError> {
        if n > self.cards.len() {
            return Err(TrucoError::InsufficientCards { requested: n, remaining: self.cards.len() });
        }
        Ok(self.cards.drain(..n).collect())
    }

    /// 翻出 vira：抽走一张，不发给任何玩家
    pub fn draw_indicator(&mut self) -> Result<Card, TrucoError> {
        let mut drawn = self.draw(1)?;
        drawn.pop().ok_or(TrucoError::InsufficientCards { requested: 1, remaining: 0 })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        Deck::new()
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use Rank::*;
    use Suit::*;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn test_plain_power_follows_rank_order() {
        let powers: Vec<u8> = Rank::ALL.iter().map(|&r| card(r, Copas).power(Seven)).collect();
        assert_eq!(powers[0], 1);
        assert_eq!(powers[9], 10);
        assert!(card(Three, Ouros).power(Four) > card(Two, Paus).power(Four));
        assert!(card(Queen, Paus).power(Four) < card(Jack, Ouros).power(Four));
    }

    #[test]
    fn test_manilha_power_by_suit() {
        assert_eq!(card(Seven, Ouros).power(Seven), 21);
        assert_eq!(card(Seven, Espadas).power(Seven), 22);
        assert_eq!(card(Seven, Copas).power(Seven), 23);
        assert_eq!(card(Seven, Paus).power(Seven), 24);
        assert!(card(Four, Ouros).power(Four) > card(Three, Paus).power(Four));
    }

    #[test]
    fn test_seven_of_paus_beats_ace_of_espadas() {
        assert_eq!(card(Seven, Paus).power(Seven), 24);
        assert_eq!(card(Ace, Espadas).power(Seven), 8);
    }

    #[test]
    fn test_concealed_card_has_no_power() {
        let mut c = card(Seven, Paus);
        c.is_concealed = true;
        assert_eq!(c.power(Seven), 0);
        assert_eq!(c.to_string(), "??");
    }

    #[test]
    fn test_successor_wraps() {
        let ranking = Ranking::STANDARD;
        assert_eq!(ranking.successor(Three), Four);
        assert_eq!(ranking.successor(Seven), Queen);
        assert_eq!(ranking.successor(Ace), Two);
    }

    #[test]
    fn test_custom_ranking_rejects_duplicates() {
        let mut ranks = Rank::ALL;
        ranks[0] = Five;
        assert!(Ranking::new(ranks, Suit::ALL).is_err());
        let suits = [Paus, Copas, Espadas, Ouros];
        let ranking = Ranking::new(Rank::ALL, suits).unwrap();
        assert_eq!(ranking.power(&card(Six, Ouros), Six), 24);
    }

    #[test]
    fn test_deck_has_forty_unique_cards() {
        let deck = Deck::new();
        assert_eq!(deck.len(), 40);
        let faces: HashSet<(Rank, Suit)> = deck.cards().iter().map(|c| (c.rank, c.suit)).collect();
        assert_eq!(faces.len(), 40);
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut deck = Deck::new();
        deck.shuffle(&mut StdRng::seed_from_u64(7));
        assert_eq!(deck.len(), 40);
        let faces: HashSet<(Rank, Suit)> = deck.cards().iter().map(|c| (c.rank, c.suit)).collect();
        assert_eq!(faces.len(), 40);
        assert_ne!(deck, Deck::new());
    }

    #[test]
    fn test_draw_takes_from_front() {
        let mut deck = Deck::new();
        let drawn = deck.draw(3).unwrap();
        assert_eq!(drawn, vec![card(Four, Ouros), card(Four, Espadas), card(Four, Copas)]);
        assert_eq!(deck.len(), 37);
        assert_eq!(deck.draw_indicator().unwrap(), card(Four, Paus));
        assert_eq!(deck.len(), 36);
    }

    #[test]
    fn test_draw_too_many() {
        let mut deck = Deck::from_cards(vec![card(Ace, Copas)]).unwrap();
        assert_eq!(
            deck.draw(2),
            Err(TrucoError::InsufficientCards { requested: 2, remaining: 1 })
        );
        assert_eq!(deck.len(), 1);
        deck.draw_indicator().unwrap();
        assert!(deck.draw_indicator().is_err());
    }

    #[test]
    fn test_stacked_deck_rejects_repeated_card() {
        let mut trump = card(Seven, Paus);
        trump.is_trump = true;
        let result = Deck::from_cards(vec![card(Seven, Paus), card(Ace, Copas), trump]);
        assert_eq!(result, Err(TrucoError::DuplicateCard(trump)));

        let deck = Deck::from_cards(vec![card(Seven, Paus), card(Seven, Copas)]).unwrap();
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_parse_card() {
        assert_eq!("7P".parse::<Card>().unwrap(), card(Seven, Paus));
        assert_eq!("ae".parse::<Card>().unwrap(), card(Ace, Espadas));
        assert!("8P".parse::<Card>().is_err());
        assert!("7PX".parse::<Card>().is_err());
        assert_eq!(card(Queen, Ouros).to_string(), "Q♦");
    }
}
