use std::io::{BufRead, Write};
use truco_core::{Card, CardChoice, DecisionError, DecisionProvider, TableView, WagerResponse, MAX_STAKE};

/// 终端玩家：从输入读取决定，输入无效时重新询问
pub struct ConsolePlayer<R, W> {
    name: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePlayer<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        ConsolePlayer { name: name.into(), input, output }
    }

    /// 打印提示并读取一行（去空白、转小写）
    fn ask(&mut self, prompt: &str) -> Result<String, DecisionError> {
        write!(self.output, "[{}] {} ", self.name, prompt).map_err(io_error)?;
        self.output.flush().map_err(io_error)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(io_error)?;
        if read == 0 {
            return Err(DecisionError::InputClosed);
        }
        Ok(line.trim().to_lowercase())
    }

    /// 反复询问直到 `parse` 接受回答
    fn ask_until<T>(&mut self, prompt: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T, DecisionError> {
        loop {
            let answer = self.ask(prompt)?;
            match parse(&answer) {
                Some(value) => return Ok(value),
                None => writeln!(self.output, "输入无效: {answer:?}").map_err(io_error)?,
            }
        }
    }

    fn show_table(&mut self, view: &TableView) -> Result<(), DecisionError> {
        let table: Vec<String> = view
            .table
            .iter()
            .map(|t| match t.card {
                Some(card) => format!("seat {}: {card}", t.seat),
                None => format!("seat {}: ??", t.seat),
            })
            .collect();
        writeln!(
            self.output,
            "-- hand {} trick {} | vira {} (manilha {}) | stake {} | {}-{}",
            view.hand_number,
            view.trick_number,
            view.indicator,
            view.trump_rank,
            view.wager_value,
            view.scores.team_one,
            view.scores.team_two,
        )
        .map_err(io_error)?;
        if !table.is_empty() {
            writeln!(self.output, "   table: {}", table.join(", ")).map_err(io_error)?;
        }
        Ok(())
    }
}

fn io_error(e: std::io::Error) -> DecisionError {
    DecisionError::Internal(e.to_string())
}

fn yes_no(answer: &str) -> Option<bool> {
    match answer {
        "s" | "sim" | "y" | "yes" => Some(true),
        "n" | "nao" | "não" | "no" => Some(false),
        _ => None,
    }
}

impl<R: BufRead, W: Write> DecisionProvider for ConsolePlayer<R, W> {
    fn choose_card(&mut self, hand: &[Card], table: &TableView) -> Result<CardChoice, DecisionError> {
        self.show_table(table)?;
        let listing: Vec<String> = hand.iter().enumerate().map(|(i, c)| format!("{}) {c}", i + 1)).collect();
        writeln!(self.output, "   hand: {}", listing.join("  ")).map_err(io_error)?;

        let size = hand.len();
        let index = self.ask_until(&format!("card [1-{size}]?"), |answer| {
            answer.parse::<usize>().ok().filter(|n| (1..=size).contains(n)).map(|n| n - 1)
        })?;
        let conceal = if table.can_conceal() {
            self.ask_until("face down? (s/n)", yes_no)?
        } else {
            false
        };
        Ok(CardChoice { index, conceal })
    }

    fn respond_to_wager(
        &mut self,
        current: u8,
        proposed: u8,
        table: &TableView,
    ) -> Result<WagerResponse, DecisionError> {
        self.show_table(table)?;
        let can_raise = proposed < MAX_STAKE;
        let prompt = if can_raise {
            format!("truco! {current} -> {proposed}. sim/nao/aumentar?")
        } else {
            format!("truco! {current} -> {proposed}. sim/nao?")
        };
        self.ask_until(&prompt, |answer| match answer {
            "s" | "sim" => Some(WagerResponse::Accept),
            "n" | "nao" | "não" => Some(WagerResponse::Decline),
            "a" | "aumentar" if can_raise => Some(WagerResponse::Raise),
            _ => None,
        })
    }

    fn wants_to_call(&mut self, table: &TableView) -> Result<bool, DecisionError> {
        self.show_table(table)?;
        let hand: Vec<String> = table.hand.iter().map(Card::to_string).collect();
        writeln!(self.output, "   hand: {}", hand.join(" ")).map_err(io_error)?;
        self.ask_until("call truco? (s/n)", yes_no)
    }
}
