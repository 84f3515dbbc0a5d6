use proptest::prelude::*;
use truco_core::*;

fn rank() -> impl Strategy<Value = Rank> {
    prop::sample::select(Rank::ALL.to_vec())
}

fn suit() -> impl Strategy<Value = Suit> {
    prop::sample::select(Suit::ALL.to_vec())
}

fn card() -> impl Strategy<Value = Card> {
    (rank(), suit()).prop_map(|(r, s)| Card::new(r, s))
}

fn response() -> impl Strategy<Value = WagerResponse> {
    prop::sample::select(vec![WagerResponse::Accept, WagerResponse::Decline, WagerResponse::Raise])
}

proptest! {
    /// 非管牌点数大则牌力大，任何 manilha 都大于非管牌
    #[test]
    fn prop_power_ordering(a in card(), b in card(), trump in rank()) {
        let (pa, pb) = (a.power(trump), b.power(trump));
        match (a.rank == trump, b.rank == trump) {
            (false, false) => prop_assert_eq!(a.rank.cmp(&b.rank), pa.cmp(&pb)),
            (true, false) => prop_assert!(pa > pb),
            (false, true) => prop_assert!(pa < pb),
            (true, true) => prop_assert_eq!(a.suit.cmp(&b.suit), pa.cmp(&pb)),
        }
    }

    #[test]
    fn prop_trump_is_next_rank(indicator in card()) {
        let trump = resolve_trump(indicator);
        let idx = Rank::ALL.iter().position(|r| *r == indicator.rank).unwrap();
        prop_assert_eq!(trump.rank, Rank::ALL[(idx + 1) % Rank::ALL.len()]);
        prop_assert_ne!(trump.rank, indicator.rank);
    }

    /// 有赢家时，赢家持有唯一的最大牌
    #[test]
    fn prop_trick_winner_is_unique_best(cards in prop::collection::vec(card(), 2..=12), trump in rank()) {
        let plays: Vec<Play> = cards
            .iter()
            .enumerate()
            .map(|(seat, &card)| Play { seat, team: Team::of_seat(seat), card })
            .collect();
        let best = plays.iter().map(|p| p.card.power(trump)).max().unwrap();
        let top = plays.iter().filter(|p| p.card.power(trump) == best).count();
        match resolve_trick(&plays, trump) {
            Some(seat) => {
                prop_assert_eq!(top, 1);
                prop_assert_eq!(plays[seat].card.power(trump), best);
            }
            None => prop_assert!(top > 1),
        }
    }

    /// 无论如何回应，赌注只会按档位上升且不超过 12
    #[test]
    fn prop_wager_monotonic(answers in prop::collection::vec(response(), 1..12), first in prop::bool::ANY) {
        let mut wager = Wager::new();
        let mut caller = if first { Team::One } else { Team::Two };
        let mut last = wager.value();
        for answer in answers {
            let Ok(mut proposal) = wager.call(caller) else { break };
            prop_assert_eq!(Some(proposal.to), next_stake(proposal.from));
            let step = loop {
                match wager.respond(proposal, answer) {
                    WagerStep::Raised(next) => {
                        prop_assert!(wager.value() > last);
                        last = wager.value();
                        prop_assert_eq!(wager.last_raiser(), Some(next.caller));
                        proposal = next;
                    }
                    other => break other,
                }
            };
            prop_assert!(wager.value() >= last);
            prop_assert!(wager.value() <= MAX_STAKE);
            prop_assert!(STAKES.contains(&wager.value()));
            last = wager.value();
            if let WagerStep::Declined { .. } = step {
                break;
            }
            // 最后加注的一方不能紧接着再喊
            if let Some(raiser) = wager.last_raiser() {
                prop_assert!(wager.call(raiser).is_err());
                caller = raiser.opponent();
            }
        }
    }

    #[test]
    fn prop_deal_fits_in_deck(per_team in 1usize..=MAX_PLAYERS_PER_TEAM, seed in any::<u64>()) {
        use rand::SeedableRng;
        let mut deck = Deck::new();
        deck.shuffle(&mut rand::rngs::StdRng::seed_from_u64(seed));
        for _ in 0..per_team * 2 {
            prop_assert_eq!(deck.draw(HAND_SIZE).unwrap().len(), HAND_SIZE);
        }
        prop_assert!(deck.draw_indicator().is_ok());
        prop_assert_eq!(deck.len(), 40 - per_team * 6 - 1);
    }

    /// 每一墩都被计入，且某队净赢两墩后这手牌即结束
    #[test]
    fn prop_hand_tally_accounts_for_every_trick(seed in any::<u64>(), per_team in 1usize..=3) {
        let seats = (0..per_team * 2)
            .map(|i| {
                let provider: Box<dyn DecisionProvider> = Box::new(RandomPlayer::new(Some(seed ^ i as u64)));
                SeatAssignment::new(format!("p{i}"), provider)
            })
            .collect();
        let config = TableConfig { players_per_team: per_team, seed: Some(seed), ..TableConfig::default() };
        let mut game = TrucoMatch::new(config, seats).unwrap();
        let mut events: Vec<MatchEvent> = Vec::new();
        let summary = game.play_hand(&mut events).unwrap();

        let tricks = events.iter().filter(|e| matches!(e, MatchEvent::TrickResolved { .. })).count();
        let tally = summary.tally;
        prop_assert_eq!(usize::from(tally.team_one + tally.team_two + tally.draws), tricks);
        prop_assert!(tally.played() <= TRICKS_PER_HAND);
        prop_assert!(tally.team_one <= TRICKS_TO_WIN && tally.team_two <= TRICKS_TO_WIN);

        match summary.outcome {
            HandOutcome::Won { team, points } => {
                prop_assert!(tally.credits(team) > tally.credits(team.opponent()));
                prop_assert_eq!(points, summary.stake);
            }
            HandOutcome::Tied => prop_assert_eq!(tally.credits(Team::One), tally.credits(Team::Two)),
            HandOutcome::Forfeited { points, .. } => prop_assert!(points < MAX_STAKE),
        }
        prop_assert!(summary.scores.team_one <= 12 && summary.scores.team_two <= 12);
    }
}
