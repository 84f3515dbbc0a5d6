use std::io::Write;
use truco_core::{EventSink, HandOutcome, MatchEvent, Player};
use tracing::warn;

/// 打印比赛事件：可读文本，或每行一个 JSON 对象
pub struct Printer<W> {
    out: W,
    json: bool,
    names: Vec<String>,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, json: bool, players: &[Player]) -> Self {
        Printer { out, json, names: players.iter().map(|p| p.name.clone()).collect() }
    }

    fn name(&self, seat: usize) -> &str {
        self.names.get(seat).map(String::as_str).unwrap_or("?")
    }

    fn text(&self, event: &MatchEvent) -> String {
        match event {
            MatchEvent::HandStarted { hand_number, starter, scores, .. } => format!(
                "\n=== hand {hand_number} ({} starts) score {}-{} ===",
                self.name(*starter),
                scores.team_one,
                scores.team_two
            ),
            MatchEvent::TrumpRevealed { indicator, trump_rank } => {
                format!("vira: {indicator}, manilhas: {trump_rank}")
            }
            MatchEvent::TrickStarted { trick_number, lead } => {
                format!("-- trick {trick_number}, {} leads", self.name(*lead))
            }
            MatchEvent::WagerCalled { seat, team, from, to, raise } => {
                let word = if *raise { "raises" } else { "calls truco" };
                format!("{} ({team}) {word}: {from} -> {to}", self.name(*seat))
            }
            MatchEvent::WagerAnswered { seat, response, value, .. } => {
                format!("{} answers {response} (stake {value})", self.name(*seat))
            }
            MatchEvent::CardPlayed { seat, card, .. } => match card {
                Some(card) => format!("{} plays {card}", self.name(*seat)),
                None => format!("{} plays a card face down", self.name(*seat)),
            },
            MatchEvent::ChoiceRejected { seat, reason } => format!("{}: {reason}", self.name(*seat)),
            MatchEvent::TrickResolved { trick_number, winner, winning_team, .. } => match (winner, winning_team) {
                (Some(seat), Some(team)) => format!("trick {trick_number} to {} ({team})", self.name(*seat)),
                _ => format!("trick {trick_number} drawn"),
            },
            MatchEvent::HandSettled { hand_number, outcome, scores } => {
                let result = match outcome {
                    HandOutcome::Won { team, points } => format!("{team} wins {points}"),
                    HandOutcome::Forfeited { team, points } => format!("{team} takes {points} (declined)"),
                    HandOutcome::Tied => "tied, no points".to_string(),
                };
                format!("hand {hand_number}: {result}. score {}-{}", scores.team_one, scores.team_two)
            }
            MatchEvent::MatchOver { winner, scores, hands_played, .. } => format!(
                "\n*** {winner} wins the match {}-{} after {hands_played} hands ***",
                scores.team_one, scores.team_two
            ),
        }
    }
}

impl<W: Write> EventSink for Printer<W> {
    fn publish(&mut self, event: MatchEvent) {
        let line = if self.json {
            match serde_json::to_string(&event) {
                Ok(line) => line,
                Err(e) => {
                    warn!("序列化事件失败: {}", e);
                    return;
                }
            }
        } else {
            self.text(&event)
        };
        if let Err(e) = writeln!(self.out, "{line}") {
            warn!("写出事件失败: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use truco_core::{Scoreboard, Team, TrickTally};

    fn players() -> Vec<Player> {
        ["ana", "bia"]
            .iter()
            .enumerate()
            .map(|(seat, name)| Player { seat, name: name.to_string(), team: Team::of_seat(seat), hand: Vec::new() })
            .collect()
    }

    #[test]
    fn test_text_lines() {
        let mut printer = Printer::new(Vec::new(), false, &players());
        printer.publish(MatchEvent::CardPlayed { seat: 1, team: Team::Two, card: None });
        printer.publish(MatchEvent::TrickResolved {
            trick_number: 2,
            winner: Some(0),
            winning_team: Some(Team::One),
            tally: TrickTally::default(),
        });
        let out = String::from_utf8(printer.out).unwrap();
        assert_eq!(out, "bia plays a card face down\ntrick 2 to ana (Team 1)\n");
    }

    #[test]
    fn test_json_lines() {
        let mut printer = Printer::new(Vec::new(), true, &players());
        let event = MatchEvent::HandSettled {
            hand_number: 3,
            outcome: HandOutcome::Forfeited { team: Team::Two, points: 3 },
            scores: Scoreboard { team_one: 4, team_two: 7 },
        };
        printer.publish(event.clone());
        let out = String::from_utf8(printer.out).unwrap();
        assert_eq!(out.lines().count(), 1);
        let back: MatchEvent = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(back, event);
    }
}
