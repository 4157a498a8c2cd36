// feedline - Live message feed interaction engine for chat views
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("failed to read engine config {path}: {reason}")]
    ConfigUnreadable { path: String, reason: String },
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
    #[error("failed to read scenario {path}: {reason}")]
    ScenarioUnreadable { path: String, reason: String },
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
    #[error("logic context closed")]
    LogicContextClosed,
}

impl FeedError {
    pub const CONFIG_UNREADABLE_EXIT_CODE: i32 = 20;
    pub const INVALID_CONFIG_EXIT_CODE: i32 = 21;
    pub const SCENARIO_UNREADABLE_EXIT_CODE: i32 = 22;
    pub const INVALID_SCENARIO_EXIT_CODE: i32 = 23;
    pub const LOGIC_CONTEXT_CLOSED_EXIT_CODE: i32 = 24;

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigUnreadable { .. } => Self::CONFIG_UNREADABLE_EXIT_CODE,
            Self::InvalidConfig(_) => Self::INVALID_CONFIG_EXIT_CODE,
            Self::ScenarioUnreadable { .. } => Self::SCENARIO_UNREADABLE_EXIT_CODE,
            Self::InvalidScenario(_) => Self::INVALID_SCENARIO_EXIT_CODE,
            Self::LogicContextClosed => Self::LOGIC_CONTEXT_CLOSED_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ConfigUnreadable { .. } => {
                "Engine config could not be read. Check the path passed to --config."
            }
            Self::InvalidConfig(_) => "Engine config is invalid. Run with --log-file for details.",
            Self::ScenarioUnreadable { .. } => "Scenario file could not be read.",
            Self::InvalidScenario(_) => "Scenario file is not a valid feed scenario.",
            Self::LogicContextClosed => "The logic context stopped before the replay finished.",
        }
    }
}
