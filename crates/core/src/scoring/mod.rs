pub mod decision;
pub mod fundamental;
pub mod probability;
pub mod signal;

pub use decision::{final_decision, DecisionThresholds};
pub use fundamental::{FundamentalScore, NeutralReason, NEUTRAL_SCORE};
pub use probability::{composite, expectancy, technical_chance, CompositeWeights};
pub use signal::{technical_recommendation, SignalInputs, SignalNote, SignalRule, TechnicalAssessment};
