use crate::config::AgentRole;

/// The five ordered stages. No skipping; only restart re-enters `Clarify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Clarify,
    Explore,
    Compare,
    Reflect,
    Decide,
}

pub const ALL_STAGES: [Stage; 5] = [
    Stage::Clarify,
    Stage::Explore,
    Stage::Compare,
    Stage::Reflect,
    Stage::Decide,
];

impl Stage {
    pub fn number(self) -> u8 {
        match self {
            Stage::Clarify => 1,
            Stage::Explore => 2,
            Stage::Compare => 3,
            Stage::Reflect => 4,
            Stage::Decide => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Clarify => "Clarify",
            Stage::Explore => "Explore",
            Stage::Compare => "Compare",
            Stage::Reflect => "Reflect",
            Stage::Decide => "Decide",
        }
    }

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Clarify => Some(Stage::Explore),
            Stage::Explore => Some(Stage::Compare),
            Stage::Compare => Some(Stage::Reflect),
            Stage::Reflect => Some(Stage::Decide),
            Stage::Decide => None,
        }
    }

    /// Agent consulted when leaving this stage.
    pub fn agent_role(self) -> Option<AgentRole> {
        match self {
            Stage::Clarify => Some(AgentRole::DecisionClarifier),
            Stage::Explore => Some(AgentRole::TradeOffMapper),
            Stage::Compare => Some(AgentRole::BiasDetector),
            Stage::Reflect => Some(AgentRole::FramingAssistant),
            Stage::Decide => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.number(), self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Complete,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageIndicator {
    pub stage: Stage,
    pub status: StageStatus,
}

pub fn stage_indicators(current: Stage) -> Vec<StageIndicator> {
    ALL_STAGES
        .iter()
        .map(|&stage| StageIndicator {
            stage,
            status: match stage.cmp(&current) {
                std::cmp::Ordering::Less => StageStatus::Complete,
                std::cmp::Ordering::Equal => StageStatus::Current,
                std::cmp::Ordering::Greater => StageStatus::Upcoming,
            },
        })
        .collect()
}
