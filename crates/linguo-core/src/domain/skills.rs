/*
[INPUT]:  Translator skill declarations (language + CEFR level)
[OUTPUT]: Predicate telling whether a task fits the translator
[POS]:    Domain layer - skill matching used by sorting tiebreakers
[UPDATE]: When quality tier requirements or language matching rules change
*/

use std::collections::HashMap;

use linguo_adapter::{CefrLevel, Task};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub language: String,
    pub level: CefrLevel,
}

/// Matches tasks whose source and target languages are both covered at the
/// level required by the task's quality tier.
#[derive(Debug, Clone, Default)]
pub struct SkillsMatcher {
    levels: HashMap<String, CefrLevel>,
}

impl SkillsMatcher {
    pub fn new(skills: &[Skill]) -> Self {
        let mut levels: HashMap<String, CefrLevel> = HashMap::new();
        for skill in skills {
            let level = levels
                .entry(skill.language.to_ascii_lowercase())
                .or_insert(skill.level);
            *level = (*level).max(skill.level);
        }
        Self { levels }
    }

    pub fn matches(&self, task: &Task) -> bool {
        let required = task.expected_quality.required_level();
        [&task.source_language, &task.target_language]
            .into_iter()
            .all(|language| {
                self.levels
                    .get(&language.to_ascii_lowercase())
                    .is_some_and(|level| *level >= required)
            })
    }
}
