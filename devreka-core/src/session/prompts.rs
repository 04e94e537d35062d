//! Prompt templates and the option groups they are built from

use super::errors::SessionError;
use std::fmt;
use std::str::FromStr;

/// Kind of developer the idea is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdeaType {
    Frontend,
    Backend,
    FullStack,
    Mobile,
    Games,
    DataAi,
}

impl IdeaType {
    pub const ALL: [IdeaType; 6] = [
        IdeaType::Frontend,
        IdeaType::Backend,
        IdeaType::FullStack,
        IdeaType::Mobile,
        IdeaType::Games,
        IdeaType::DataAi,
    ];

    /// Value accepted on the command line
    pub fn key(&self) -> &'static str {
        match self {
            IdeaType::Frontend => "frontend",
            IdeaType::Backend => "backend",
            IdeaType::FullStack => "fullstack",
            IdeaType::Mobile => "mobile",
            IdeaType::Games => "games",
            IdeaType::DataAi => "data-ai",
        }
    }

    /// Wording interpolated into the prompt
    pub fn label(&self) -> &'static str {
        match self {
            IdeaType::Frontend => "frontend web",
            IdeaType::Backend => "backend",
            IdeaType::FullStack => "full-stack web",
            IdeaType::Mobile => "mobile apps",
            IdeaType::Games => "video games",
            IdeaType::DataAi => "data science and AI",
        }
    }
}

impl fmt::Display for IdeaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for IdeaType {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        IdeaType::ALL
            .into_iter()
            .find(|t| t.key() == wanted)
            .ok_or_else(|| SessionError::invalid("idea type", s))
    }
}

/// Implementation difficulty requested for the idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn key(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Difficulty {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.key() == wanted)
            .ok_or_else(|| SessionError::invalid("difficulty", s))
    }
}

/// Structured request for a new business idea
pub fn idea_prompt(idea_type: IdeaType, difficulty: Difficulty, language: &str) -> String {
    format!(
        "Act as an expert business strategist and senior software developer. Generate an \
innovative project idea with high business potential for a {kind} developer, with a {difficulty} \
implementation difficulty.

**Instructions:**

1.  **Unique Concept:** The idea must be original and uncommon, avoiding clichés and projects \
that have been done many times. Do not use names that already exist. Think of underserved market \
niches or an unexpected combination of two or more fields.
2.  **Business Analysis:**
    *   **Description:** Describe the idea in 1-2 paragraphs.
    *   **Value Proposition:** Explain clearly why it is a good business idea. What problem does \
it solve? What is its market and monetization potential?
3.  **Technical Analysis:**
    *   **Programming Difficulty:** Rate the implementation difficulty on a scale of (Easy, \
Medium, Hard) and briefly justify it (e.g. it needs complex algorithms, integration with many \
services, etc.). Make sure the rated difficulty matches the requested one ({difficulty}).
    *   **Recommended Technologies:** Suggest a suitable tech stack (languages, frameworks, \
databases, etc.) for the project.
    *   **First Steps / Tasks:** List the first 3 to 5 concrete steps or tasks the developer \
should take to start building the project.
4.  **Format:**
    *   Use Markdown for a clear, structured presentation.
    *   Answer entirely in {language}.
    *   Finish with 3-4 emojis that capture the essence of the project.",
        kind = idea_type.label(),
        difficulty = difficulty,
        language = language,
    )
}

/// Request for a prompt another coding assistant can use to scaffold `idea`
pub fn meta_prompt(idea: &str, language: &str) -> String {
    format!(
        "
Act as an expert in prompt engineering for generative AI models.
Your task is to write a prompt for a programming AI asking it to build the following project idea.
The prompt you write must be clear, concise, and follow best practices for high-quality results.

**Original Project Idea:**
{idea}

**Instructions for the prompt you will write:**
1. The prompt must start with a friendly greeting and a clear introduction of the task.
2. It must include the description of the idea, the recommended technologies and the first tasks, \
taken from the original idea.
3. It must ask the AI to act as a senior software developer and mentor.
4. It must ask the AI to produce a file structure and the initial code for the project.
5. It must tell the AI to explain every step of the process.
6. The prompt must be written in {language}.

Output only the prompt for the AI, with no extra text before or after it.
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idea_prompt_interpolates_choices() {
        let prompt = idea_prompt(IdeaType::Mobile, Difficulty::Hard, "English");
        assert!(prompt.contains("for a mobile apps developer"));
        assert!(prompt.contains("matches the requested one (hard)"));
        assert!(prompt.contains("Answer entirely in English"));
        assert!(prompt.contains("3-4 emojis"));
    }

    #[test]
    fn test_meta_prompt_embeds_idea() {
        let prompt = meta_prompt("# Plant Radar", "Spanish");
        assert!(prompt.contains("**Original Project Idea:**\n# Plant Radar\n"));
        assert!(prompt.contains("written in Spanish"));
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!("Data-AI".parse::<IdeaType>().unwrap(), IdeaType::DataAi);
        assert_eq!(" medium ".parse::<Difficulty>().unwrap(), Difficulty::Medium);

        let err = "impossible".parse::<Difficulty>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown difficulty 'impossible'");
    }
}
