// Data models for every feature area

pub mod achievement;
pub mod coach;
pub mod daily_goal;
pub mod fasting;
pub mod meal;
pub mod mindfulness;
pub mod journey;
pub mod profile;
pub mod progress;
pub mod supplement;
pub mod user;

pub use achievement::*;
pub use coach::*;
pub use daily_goal::*;
pub use fasting::*;
pub use meal::*;
pub use mindfulness::*;
pub use journey::*;
pub use profile::*;
pub use progress::*;
pub use supplement::*;
pub use user::*;
