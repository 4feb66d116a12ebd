//! Level files and the headless runner that plays them

pub mod level;
pub mod runner;
pub mod script;

pub use level::{load_scenario, parse_scenario, ScenarioFile};
pub use runner::{EventTally, RunSummary, ScenarioRunner};
pub use script::PlayerScript;
