use crate::card::{Card, Rank, Ranking};
use crate::config::TableConfig;
use crate::decision::DecisionProvider;
use crate::error::TrucoError;
use crate::trick::{Play, TrickTally};
use crate::trump::Trump;
use crate::wager::Wager;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type MatchId = Uuid;
/// 座位号。两队交替就座：偶数座位属于 [`Team::One`]，奇数座位属于 [`Team::Two`]
pub type Seat = usize;

pub const HAND_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    One,
    Two,
}

impl Team {
    pub fn of_seat(seat: Seat) -> Team {
        if seat % 2 == 0 { Team::One } else { Team::Two }
    }

    pub fn opponent(self) -> Team {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Team::One => "Team 1",
            Team::Two => "Team 2",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub seat: Seat,
    pub name: String,
    pub team: Team,
    pub hand: Vec<Card>,  // 手牌，出牌后移除
}

/// 比分
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub team_one: u8,
    pub team_two: u8,
}

impl Scoreboard {
    pub fn get(&self, team: Team) -> u8 {
        match team {
            Team::One => self.team_one,
            Team::Two => self.team_two,
        }
    }

    /// 给 `team` 加分，最多加到 `target`
    pub fn award(&mut self, team: Team, points: u8, target: u8) {
        let slot = match team {
            Team::One => &mut self.team_one,
            Team::Two => &mut self.team_two,
        };
        *slot = slot.saturating_add(points).min(target);
    }

    pub fn leader_at(&self, target: u8) -> Option<Team> {
        if self.team_one >= target {
            Some(Team::One)
        } else if self.team_two >= target {
            Some(Team::Two)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandPhase {
    Dealt,
    Trick(u8),
    Settled,
}

/// 一手牌的临时状态，结算后丢弃
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandState {
    pub number: u32,
    pub phase: HandPhase,
    pub trump: Trump,
    pub wager: Wager,
    /// 本墩第一个出牌的座位
    pub lead: Seat,
    /// 本墩桌上的牌，按出牌顺序
    pub table: Vec<Play>,
    pub tally: TrickTally,
}

impl HandState {
    pub fn new(number: u32, trump: Trump, lead: Seat) -> HandState {
        HandState {
            number,
            phase: HandPhase::Dealt,
            trump,
            wager: Wager::new(),
            lead,
            table: Vec::new(),
            tally: TrickTally::default(),
        }
    }

    /// 当前墩号（从 1 开始），第一墩开始前为 0
    pub fn trick_number(&self) -> u8 {
        match self.phase {
            HandPhase::Dealt => 0,
            HandPhase::Trick(n) => n,
            HandPhase::Settled => self.tally.played(),
        }
    }

    pub fn begin_trick(&mut self) -> u8 {
        let next = self.trick_number() + 1;
        self.phase = HandPhase::Trick(next);
        self.table.clear();
        next
    }

    /// 从领出者开始绕桌一圈，每个座位一次
    pub fn play_order(&self, seats: usize) -> Vec<Seat> {
        (0..seats).map(|i| (self.lead + i) % seats).collect()
    }
}

/// 其他座位看到的桌面牌，`None` 表示扣下的牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCard {
    pub seat: Seat,
    pub team: Team,
    pub card: Option<Card>,
}

/// 某个座位做决定时能看到的信息。
/// 每次询问重新生成，不包含其他玩家的手牌。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableView {
    pub seat: Seat,
    pub team: Team,
    pub hand: Vec<Card>,
    pub hand_number: u32,
    pub trick_number: u8,
    pub table: Vec<TableCard>,
    pub wager_value: u8,
    pub last_raiser: Option<Team>,
    pub indicator: Card,
    pub trump_rank: Rank,
    pub tally: TrickTally,
    pub scores: Scoreboard,
    pub match_target: u8,
}

impl TableView {
    /// 从第二墩开始才能扣牌
    pub fn can_conceal(&self) -> bool {
        self.trick_number >= 2
    }

    /// 桌上已出牌中的最大牌力
    pub fn table_best(&self, ranking: &Ranking) -> u8 {
        self.table
            .iter()
            .filter_map(|t| t.card)
            .map(|c| ranking.power(&c, self.trump_rank))
            .max()
            .unwrap_or(0)
    }
}

/// 一个座位：名字和替它做决定的一方
pub struct SeatAssignment {
    pub name: String,
    pub provider: Box<dyn DecisionProvider>,
}

impl SeatAssignment {
    pub fn new(name: impl Into<String>, provider: Box<dyn DecisionProvider>) -> SeatAssignment {
        SeatAssignment { name: name.into(), provider }
    }
}

/// 一场比赛 (match)：座位、比分和轮转。拥有全部可变的比赛状态；
/// 每手牌的 [`HandState`] 只在打牌期间存在。
pub struct TrucoMatch {
    pub(crate) id: MatchId,
    pub(crate) config: TableConfig,
    pub(crate) ranking: Ranking,
    pub(crate) players: Vec<Player>,
    pub(crate) providers: Vec<Box<dyn DecisionProvider>>,
    pub(crate) scores: Scoreboard,
    /// 下一手牌第一墩的首家
    pub(crate) starter: Seat,
    pub(crate) hands_played: u32,
    pub(crate) tied_hands: u32,
    pub(crate) rng: StdRng,
}

impl TrucoMatch {
    /// 座位按桌上顺序给出，两队交替
    pub fn new(config: TableConfig, seats: Vec<SeatAssignment>) -> Result<TrucoMatch, TrucoError> {
        TrucoMatch::with_ranking(config, Ranking::STANDARD, seats)
    }

    pub fn with_ranking(
        config: TableConfig,
        ranking: Ranking,
        seats: Vec<SeatAssignment>,
    ) -> Result<TrucoMatch, TrucoError> {
        config.validate()?;
        if seats.len() != config.seats() {
            return Err(TrucoError::SeatCount { expected: config.seats(), got: seats.len() });
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let (players, providers): (Vec<Player>, Vec<Box<dyn DecisionProvider>>) = seats
            .into_iter()
            .enumerate()
            .map(|(seat, assignment)| {
                let player = Player { seat, name: assignment.name, team: Team::of_seat(seat), hand: Vec::new() };
                (player, assignment.provider)
            })
            .unzip();

        Ok(TrucoMatch {
            id: Uuid::new_v4(),
            config,
            ranking,
            players,
            providers,
            scores: Scoreboard::default(),
            starter: 0,
            hands_played: 0,
            tied_hands: 0,
            rng,
        })
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn scores(&self) -> Scoreboard {
        self.scores
    }

    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }

    pub fn starter(&self) -> Seat {
        self.starter
    }

    pub fn winner(&self) -> Option<Team> {
        self.scores.leader_at(self.config.match_target)
    }

    /// 交给 `seat` 决策方的快照：自己的手牌、遮住扣牌的桌面和比分
    pub fn view_for(&self, seat: Seat, hand: &HandState) -> TableView {
        let table = hand
            .table
            .iter()
            .map(|p| TableCard {
                seat: p.seat,
                team: p.team,
                card: if p.card.is_concealed { None } else { Some(p.card) },
            })
            .collect();

        TableView {
            seat,
            team: Team::of_seat(seat),
            hand: self.players[seat].hand.clone(),
            hand_number: hand.number,
            trick_number: hand.trick_number(),
            table,
            wager_value: hand.wager.value(),
            last_raiser: hand.wager.last_raiser(),
            indicator: hand.trump.indicator,
            trump_rank: hand.trump.rank,
            tally: hand.tally,
            scores: self.scores,
            match_target: self.config.match_target,
        }
    }
}
