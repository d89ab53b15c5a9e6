//! Study subjects and generated exercises

mod tutor;

pub use tutor::Tutor;

use crate::error::StudyDeskError;
use crate::llm::SYSTEM_INSTRUCTION;
use crate::router::RoutingMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Course subject shown to the tutor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    #[default]
    Finance,
    Statistics,
    Law,
    ProjectManagement,
    Other,
}

impl Subject {
    pub const ALL: [Subject; 5] = [
        Subject::Finance,
        Subject::Statistics,
        Subject::Law,
        Subject::ProjectManagement,
        Subject::Other,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Finance => "Finance",
            Self::Statistics => "Statistiques",
            Self::Law => "Droit",
            Self::ProjectManagement => "Gestion de projet",
            Self::Other => "Autre",
        }
    }

    /// Fixed instruction with the subject appended
    pub fn system_instruction(&self) -> String {
        match self {
            Self::Other => SYSTEM_INSTRUCTION.to_string(),
            subject => format!(
                "{} The student is currently studying: {}.",
                SYSTEM_INSTRUCTION,
                subject.label()
            ),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Subject {
    type Err = StudyDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "finance" => Ok(Self::Finance),
            "statistics" | "statistiques" | "stats" => Ok(Self::Statistics),
            "law" | "droit" => Ok(Self::Law),
            "project_management" | "gestion_de_projet" => Ok(Self::ProjectManagement),
            "other" | "autre" => Ok(Self::Other),
            other => Err(StudyDeskError::InvalidInput(format!(
                "Unknown subject: {}",
                other
            ))),
        }
    }
}

/// Difficulty of a generated quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizLevel {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl QuizLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "débutant",
            Self::Intermediate => "intermédiaire",
            Self::Expert => "expert",
        }
    }
}

impl FromStr for QuizLevel {
    type Err = StudyDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "debutant" | "débutant" => Ok(Self::Beginner),
            "intermediate" | "intermediaire" | "intermédiaire" => Ok(Self::Intermediate),
            "expert" => Ok(Self::Expert),
            other => Err(StudyDeskError::InvalidInput(format!(
                "Unknown quiz level: {}",
                other
            ))),
        }
    }
}

/// Exercise generated from the loaded course material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "lowercase")]
pub enum StudyTask {
    Synthesis,
    Flashcards,
    Quiz { level: QuizLevel },
}

impl StudyTask {
    /// Routing mode used for the task
    pub fn mode(&self) -> RoutingMode {
        match self {
            Self::Quiz {
                level: QuizLevel::Beginner,
            } => RoutingMode::Fast,
            _ => RoutingMode::Expert,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Synthesis => "Synthèse du cours".to_string(),
            Self::Flashcards => "Cartes de révision".to_string(),
            Self::Quiz { level } => format!("Quiz ({})", level.label()),
        }
    }

    pub fn prompt(&self, subject: Subject) -> String {
        match self {
            Self::Synthesis => format!(
                "Rédige une synthèse structurée du cours de {} fourni : notions clés, \
                 définitions, formules importantes et points de vigilance.",
                subject.label()
            ),
            Self::Flashcards => format!(
                "Crée 10 cartes de révision pour le cours de {} fourni, au format \
                 « Question : … / Réponse : … », une carte par paragraphe.",
                subject.label()
            ),
            Self::Quiz { level } => format!(
                "Propose un quiz de 5 questions de niveau {} sur le cours de {} fourni. \
                 Donne d'abord les questions, puis le corrigé détaillé.",
                level.label(),
                subject.label()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_parsing() {
        assert_eq!("Statistiques".parse::<Subject>().unwrap(), Subject::Statistics);
        assert_eq!(
            "project-management".parse::<Subject>().unwrap(),
            Subject::ProjectManagement
        );
        assert_eq!(
            "Gestion de projet".parse::<Subject>().unwrap(),
            Subject::ProjectManagement
        );
        assert!("astrologie".parse::<Subject>().is_err());
    }

    #[test]
    fn test_subject_serde_names() {
        let yaml = serde_yaml::to_string(&Subject::ProjectManagement).unwrap();
        assert_eq!(yaml.trim(), "project_management");
    }

    #[test]
    fn test_system_instruction_mentions_subject() {
        assert!(Subject::Law.system_instruction().ends_with("studying: Droit."));
        assert_eq!(Subject::Other.system_instruction(), SYSTEM_INSTRUCTION);
    }

    #[test]
    fn test_task_modes() {
        assert_eq!(StudyTask::Synthesis.mode(), RoutingMode::Expert);
        assert_eq!(StudyTask::Flashcards.mode(), RoutingMode::Expert);
        assert_eq!(
            StudyTask::Quiz {
                level: QuizLevel::Beginner
            }
            .mode(),
            RoutingMode::Fast
        );
        assert_eq!(
            StudyTask::Quiz {
                level: QuizLevel::Expert
            }
            .mode(),
            RoutingMode::Expert
        );
    }

    #[test]
    fn test_quiz_prompt_mentions_level() {
        let prompt = StudyTask::Quiz {
            level: QuizLevel::Intermediate,
        }
        .prompt(Subject::Finance);
        assert!(prompt.contains("intermédiaire"));
        assert!(prompt.contains("Finance"));
        assert_eq!("Débutant".parse::<QuizLevel>().unwrap(), QuizLevel::Beginner);
    }
}
