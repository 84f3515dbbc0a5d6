use crate::error::TrucoError;
use serde::{Deserialize, Serialize};

pub const MAX_PLAYERS_PER_TEAM: usize = 6;

/// 牌桌设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub players_per_team: usize,
    /// 赢得比赛所需的分数
    pub match_target: u8,
    /// 出牌无效时最多询问的次数，用完后替它打出最小的牌
    pub choice_attempts: u8,
    /// Mão de onze：差一分就赢的队伍不能喊 truco
    pub match_point_lock: bool,
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            players_per_team: 2,
            match_target: 12,
            choice_attempts: 3,
            match_point_lock: false,
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn seats(&self) -> usize {
        self.players_per_team * 2
    }

    pub fn validate(&self) -> Result<(), TrucoError> {
        if !(1..=MAX_PLAYERS_PER_TEAM).contains(&self.players_per_team) {
            return Err(TrucoError::InvalidConfig(format!(
                "players_per_team must be between 1 and {MAX_PLAYERS_PER_TEAM}, got {}",
                self.players_per_team
            )));
        }
        if self.match_target == 0 {
            return Err(TrucoError::InvalidConfig("match_target must be at least 1".to_string()));
        }
        if self.choice_attempts == 0 {
            return Err(TrucoError::InvalidConfig("choice_attempts must be at least 1".to_string()));
        }
        Ok(())
    }
}
