//! Truco 命令行：在终端里对电脑玩家打一场或多场比赛。

mod console;
mod render;

use clap::{Parser, ValueEnum};
use console::ConsolePlayer;
use render::Printer;
use std::io;
use tracing::{debug, info};
use truco_core::{
    DecisionProvider, HeuristicPlayer, RandomPlayer, SeatAssignment, TableConfig, Team, TrucoMatch,
};

#[derive(Parser, Debug)]
#[command(name = "truco")]
#[command(about = "Play truco paulista in the terminal")]
struct Args {
    /// Players on each team (1-6)
    #[arg(long)]
    players_per_team: Option<usize>,

    /// Points needed to win a match
    #[arg(long)]
    target: Option<u8>,

    /// Seed for shuffling and the random players
    #[arg(long)]
    seed: Option<u64>,

    /// Seat played from this terminal (repeatable, 0-based)
    #[arg(long = "human")]
    humans: Vec<usize>,

    /// Strategy for computer seats
    #[arg(long, default_value = "heuristic")]
    ai: AiType,

    /// Number of matches to play
    #[arg(short, long, default_value = "1")]
    matches: u32,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Table settings as JSON; flags override it
    #[arg(long)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AiType {
    Heuristic,
    Random,
}

fn load_config(args: &Args) -> Result<TableConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str::<TableConfig>(&text)?
        }
        None => TableConfig::default(),
    };
    if let Some(n) = args.players_per_team {
        config.players_per_team = n;
    }
    if let Some(target) = args.target {
        config.match_target = target;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn seats(config: &TableConfig, args: &Args, match_no: u32) -> Vec<SeatAssignment> {
    (0..config.seats())
        .map(|seat| {
            if args.humans.contains(&seat) {
                // 缓冲区只有一个字节，多个玩家座位可以共用 stdin
                let input = io::BufReader::with_capacity(1, io::stdin());
                let provider: Box<dyn DecisionProvider> =
                    Box::new(ConsolePlayer::new(format!("seat {seat}"), input, io::stdout()));
                return SeatAssignment::new(format!("you@{seat}"), provider);
            }
            let provider: Box<dyn DecisionProvider> = match args.ai {
                AiType::Heuristic => Box::new(HeuristicPlayer::new()),
                AiType::Random => Box::new(RandomPlayer::new(
                    config.seed.map(|s| s ^ ((u64::from(match_no) << 8) | seat as u64)),
                )),
            };
            SeatAssignment::new(format!("cpu{seat}"), provider)
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 默认只输出警告，设置了 RUST_LOG 时以它为准
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| (if args.verbose { "debug" } else { "warn" }).to_string());
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let base = load_config(&args)?;
    if let Some(bad) = args.humans.iter().find(|&&seat| seat >= base.seats()) {
        return Err(format!("--human {bad}: table only has seats 0-{}", base.seats() - 1).into());
    }
    debug!(?base, "table config");

    let (mut team_one, mut team_two) = (0u32, 0u32);
    for match_no in 0..args.matches {
        let mut config = base.clone();
        // 每场比赛使用不同的发牌序列
        config.seed = base.seed.map(|s| s.wrapping_add(u64::from(match_no)));

        let mut game = TrucoMatch::new(config.clone(), seats(&config, &args, match_no))?;
        debug!(match_no, id = %game.id(), "match created");
        let mut printer = Printer::new(io::stdout(), args.json, game.players());
        let summary = game.play(&mut printer)?;
        info!(match_no, winner = %summary.winner, hands = summary.hands_played, "match finished");

        match summary.winner {
            Team::One => team_one += 1,
            Team::Two => team_two += 1,
        }
    }

    if args.matches > 1 && !args.json {
        println!("\nmatches won: Team 1 {team_one}, Team 2 {team_two}");
    }
    Ok(())
}
