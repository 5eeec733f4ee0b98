/*
[INPUT]:  Adapter task and dispute records
[OUTPUT]: Pure derived-state functions grouped per entity
[POS]:    Domain layer - module wiring
[UPDATE]: When adding domain entities
*/

pub mod dispute;
pub mod skills;
pub mod task;

pub use skills::{Skill, SkillsMatcher};
pub use task::TaskView;
