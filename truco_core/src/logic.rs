use crate::card::Deck;
use crate::decision::{CardChoice, WagerResponse};
use crate::error::{IllegalWagerCall, TrucoError};
use crate::message::{EventSink, MatchEvent};
use crate::state::*;
use crate::trick::{Play, TrickTally, TrickVerdict};
use crate::trump::mark_trumps;
use crate::wager::{Wager, WagerStep};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

/// 一手牌的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    /// 靠赢墩决出；`points` 是这手牌结束时的赌注
    Won { team: Team, points: u8 },
    /// 对方拒绝了 truco
    Forfeited { team: Team, points: u8 },
    /// 平局，不计分
    Tied,
}

impl HandOutcome {
    pub fn winner(&self) -> Option<Team> {
        match self {
            HandOutcome::Won { team, .. } | HandOutcome::Forfeited { team, .. } => Some(*team),
            HandOutcome::Tied => None,
        }
    }

    pub fn points(&self) -> u8 {
        match self {
            HandOutcome::Won { points, .. } | HandOutcome::Forfeited { points, .. } => *points,
            HandOutcome::Tied => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandSummary {
    pub hand_number: u32,
    pub outcome: HandOutcome,
    pub tally: TrickTally,
    pub stake: u8,
    pub scores: Scoreboard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub winner: Team,
    pub scores: Scoreboard,
    pub hands_played: u32,
    pub tied_hands: u32,
}

/// 检查出牌下标是否在手牌范围内
pub fn validate_choice(seat: Seat, choice: &CardChoice, hand_size: usize) -> Result<usize, TrucoError> {
    if choice.index < hand_size {
        Ok(choice.index)
    } else {
        Err(TrucoError::InvalidChoice { seat, index: choice.index, hand_size })
    }
}

// --- 核心游戏流程函数 ---

impl TrucoMatch {
    /// 连续打牌直到某队达到目标分
    pub fn play(&mut self, sink: &mut dyn EventSink) -> Result<MatchSummary, TrucoError> {
        let span = info_span!("match", id = %self.id);
        let _guard = span.enter();

        let winner = loop {
            if let Some(team) = self.winner() {
                break team;
            }
            self.play_hand(sink)?;
        };

        info!(
            %winner,
            team_one = self.scores.team_one,
            team_two = self.scores.team_two,
            hands = self.hands_played,
            "match over"
        );
        sink.publish(MatchEvent::MatchOver {
            match_id: self.id,
            winner,
            scores: self.scores,
            hands_played: self.hands_played,
        });

        Ok(MatchSummary {
            match_id: self.id,
            winner,
            scores: self.scores,
            hands_played: self.hands_played,
            tied_hands: self.tied_hands,
        })
    }

    /// 洗一副新牌并打一手
    pub fn play_hand(&mut self, sink: &mut dyn EventSink) -> Result<HandSummary, TrucoError> {
        let mut deck = Deck::with_ranking(&self.ranking);
        deck.shuffle(&mut self.rng);
        self.play_hand_from(deck, sink)
    }

    /// 开始并打完一手牌
    ///
    /// 从 `deck` 顶部给每个座位发三张牌，再翻一张作为 vira，然后逐墩进行：
    /// - 每墩出牌前，按出牌顺序每个座位都可以喊 truco；被拒绝则这手牌立即结束。
    /// - 每个座位出一张牌；赢墩者领出下一墩，平墩时领出者不变。
    /// - 先赢两墩者赢下这手牌；打满三墩后积分多的一方获胜，否则平局不计分。
    ///
    /// 结算时赢家加分（不超过目标分），首家顺延一个座位。
    pub fn play_hand_from(&mut self, mut deck: Deck, sink: &mut dyn EventSink) -> Result<HandSummary, TrucoError> {
        // 1. 发牌并翻出 vira；牌不够时不改动任何比赛状态
        let needed = self.players.len() * HAND_SIZE + 1;
        if deck.len() < needed {
            return Err(TrucoError::InsufficientCards { requested: needed, remaining: deck.len() });
        }
        let mut hands = Vec::with_capacity(self.players.len());
        for _ in 0..self.players.len() {
            hands.push(deck.draw(HAND_SIZE)?);
        }
        let indicator = deck.draw_indicator()?;
        let trump = self.ranking.resolve_trump(indicator);
        for (player, mut cards) in self.players.iter_mut().zip(hands) {
            mark_trumps(&mut cards, &trump);
            player.hand = cards;
        }

        self.hands_played += 1;
        let number = self.hands_played;

        let mut hand = HandState::new(number, trump, self.starter);
        sink.publish(MatchEvent::HandStarted {
            match_id: self.id,
            hand_number: number,
            starter: self.starter,
            scores: self.scores,
        });
        sink.publish(MatchEvent::TrumpRevealed { indicator, trump_rank: trump.rank });
        debug!(hand = number, vira = %indicator, manilha = %trump.rank, "dealt");

        // 2. 逐墩进行
        let seats = self.players.len();
        let outcome = loop {
            let trick_number = hand.begin_trick();
            sink.publish(MatchEvent::TrickStarted { trick_number, lead: hand.lead });

            if let Some(outcome) = self.offer_wagers(&mut hand, sink) {
                break outcome;
            }

            for seat in hand.play_order(seats) {
                self.take_turn(seat, &mut hand, sink)?;
            }

            let winner = self.ranking.resolve_trick(&hand.table, hand.trump.rank);
            let winning_team = winner.map(Team::of_seat);
            hand.tally.record(winning_team);
            if let Some(seat) = winner {
                hand.lead = seat;
            }
            debug!(hand = number, trick = trick_number, ?winner, "trick resolved");
            sink.publish(MatchEvent::TrickResolved { trick_number, winner, winning_team, tally: hand.tally });

            match hand.tally.verdict() {
                TrickVerdict::Pending => continue,
                TrickVerdict::Won(team) => break HandOutcome::Won { team, points: hand.wager.value() },
                TrickVerdict::Tied => break HandOutcome::Tied,
            }
        };

        // 3. 结算
        hand.phase = HandPhase::Settled;
        Ok(self.settle(&hand, outcome, sink))
    }

    /// `team` 现在能否喊 truco
    pub fn check_call(&self, team: Team, wager: &Wager) -> Result<u8, IllegalWagerCall> {
        let at_match_point = self.scores.get(team).saturating_add(1) == self.config.match_target;
        if self.config.match_point_lock && at_match_point {
            return Err(IllegalWagerCall::MatchPoint(team));
        }
        wager.check_call(team)
    }

    fn settle(&mut self, hand: &HandState, outcome: HandOutcome, sink: &mut dyn EventSink) -> HandSummary {
        match outcome.winner() {
            Some(team) => self.scores.award(team, outcome.points(), self.config.match_target),
            None => self.tied_hands += 1,
        }
        for player in &mut self.players {
            player.hand.clear();
        }
        self.starter = (self.starter + 1) % self.players.len();

        info!(
            hand = hand.number,
            ?outcome,
            team_one = self.scores.team_one,
            team_two = self.scores.team_two,
            "hand settled"
        );
        sink.publish(MatchEvent::HandSettled { hand_number: hand.number, outcome, scores: self.scores });

        HandSummary {
            hand_number: hand.number,
            outcome,
            tally: hand.tally,
            stake: hand.wager.value(),
            scores: self.scores,
        }
    }

    /// 按出牌顺序询问每个有资格的座位是否喊 truco。
    /// 若有喊叫被拒绝，返回这手牌的结果。
    fn offer_wagers(&mut self, hand: &mut HandState, sink: &mut dyn EventSink) -> Option<HandOutcome> {
        for seat in hand.play_order(self.players.len()) {
            let team = Team::of_seat(seat);
            if let Err(reason) = self.check_call(team, &hand.wager) {
                debug!(seat, %reason, "seat not offered a call");
                continue;
            }

            let view = self.view_for(seat, hand);
            let wants = self.providers[seat].wants_to_call(&view).unwrap_or_else(|err| {
                warn!(seat, %err, "call query failed, treating as no call");
                false
            });
            if !wants {
                continue;
            }

            if let Some(outcome) = self.negotiate(seat, hand, sink) {
                return Some(outcome);
            }
        }
        None
    }

    /// 处理一次喊叫及随后的连续加注。每次加注互换喊叫方与应答方，
    /// 直到接受或拒绝为止。
    fn negotiate(&mut self, caller: Seat, hand: &mut HandState, sink: &mut dyn EventSink) -> Option<HandOutcome> {
        let mut proposal = match hand.wager.call(Team::of_seat(caller)) {
            Ok(p) => p,
            Err(reason) => {
                debug!(seat = caller, %reason, "call had no effect");
                return None;
            }
        };
        let mut caller = caller;
        let mut responder = (caller + 1) % self.players.len();
        let mut raise = false;

        loop {
            debug!(seat = caller, from = proposal.from, to = proposal.to, raise, "truco");
            sink.publish(MatchEvent::WagerCalled {
                seat: caller,
                team: proposal.caller,
                from: proposal.from,
                to: proposal.to,
                raise,
            });

            let view = self.view_for(responder, hand);
            let response = match self.providers[responder].respond_to_wager(proposal.from, proposal.to, &view) {
                Ok(response) => response,
                Err(err) => {
                    warn!(seat = responder, %err, "no usable wager response, declining");
                    sink.publish(MatchEvent::ChoiceRejected { seat: responder, reason: err.to_string() });
                    WagerResponse::Decline
                }
            };

            let step = hand.wager.respond(proposal, response);
            sink.publish(MatchEvent::WagerAnswered {
                seat: responder,
                team: Team::of_seat(responder),
                response,
                value: hand.wager.value(),
            });

            match step {
                WagerStep::Accepted { .. } => return None,
                WagerStep::Declined { awarded_to, points } => {
                    return Some(HandOutcome::Forfeited { team: awarded_to, points });
                }
                WagerStep::Raised(next) => {
                    proposal = next;
                    std::mem::swap(&mut caller, &mut responder);
                    raise = true;
                }
            }
        }
    }

    fn take_turn(&mut self, seat: Seat, hand: &mut HandState, sink: &mut dyn EventSink) -> Result<(), TrucoError> {
        let choice = self.ask_for_card(seat, hand, sink)?;
        let mut card = self.players[seat].hand.remove(choice.index);

        if choice.conceal {
            if hand.trick_number() >= 2 {
                card.is_concealed = true;
            } else {
                warn!(seat, "concealment requested on the first trick, playing face up");
                sink.publish(MatchEvent::ChoiceRejected {
                    seat,
                    reason: "cards can only be concealed from the second trick".to_string(),
                });
            }
        }

        let team = Team::of_seat(seat);
        hand.table.push(Play { seat, team, card });
        sink.publish(MatchEvent::CardPlayed { seat, team, card: (!card.is_concealed).then_some(card) });
        Ok(())
    }

    /// 向 `seat` 要一张牌，无效回答会重新询问。
    /// 次数用完后改为明出手里最小的牌。
    fn ask_for_card(&mut self, seat: Seat, hand: &HandState, sink: &mut dyn EventSink) -> Result<CardChoice, TrucoError> {
        let cards = self.players[seat].hand.clone();
        if cards.is_empty() {
            return Err(TrucoError::InsufficientCards { requested: 1, remaining: 0 });
        }
        let view = self.view_for(seat, hand);

        for attempt in 1..=self.config.choice_attempts {
            let reason = match self.providers[seat].choose_card(&cards, &view) {
                Ok(choice) => match validate_choice(seat, &choice, cards.len()) {
                    Ok(_) => return Ok(choice),
                    Err(err) => err.to_string(),
                },
                Err(err) => err.to_string(),
            };
            warn!(seat, attempt, %reason, "invalid card choice");
            sink.publish(MatchEvent::ChoiceRejected { seat, reason });
        }

        let index = self.ranking.weakest(&cards, hand.trump.rank).unwrap_or(0);
        Ok(CardChoice::open(index))
    }
}

// --- 单元测试 ---
