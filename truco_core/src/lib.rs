//! # Truco 核心规则库
//!
//! 这个 `core` crate 包含 Truco (巴西 truco paulista 变体) 的全部规则:
//! 牌力与 manilha 计算、每墩胜负判定、truco 加注协商以及手牌/比赛计分。
//! 玩家的决策通过 [`DecisionProvider`] 接口注入，与具体实现（控制台、AI）解耦。

mod card;
mod config;
mod decision;
mod error;
mod logic;
mod message;
mod state;
mod strategy;
mod trick;
mod trump;
mod wager;

pub use card::*;

pub use config::*;

pub use decision::*;

pub use error::*;

pub use logic::*;

pub use message::*;

pub use state::*;

pub use strategy::*;

pub use trick::*;

pub use trump::*;

pub use wager::*;
