//! Prompt templates for each recipe

use crate::remote::RepoSlug;
use std::path::Path;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Greeting used to check a round trip end to end
    pub fn greeting() -> &'static str {
        "Hello!"
    }

    /// Ask the assistant to sort a folder into subfolders
    pub fn organize_files(target_folder: &Path) -> String {
        format!(
            r#"
Analyze the files in "{}" and organize them into subfolders.

1. First, list all files and their metadata
2. Preview grouping by file extension
3. Create appropriate subfolders (e.g., "images", "documents", "videos")
4. Move each file to its appropriate subfolder

Please confirm before moving any files.
"#,
            target_folder.display()
        )
    }

    /// Opening context and follow-up question for each independent session
    pub fn project_conversations() -> [(&'static str, &'static str); 3] {
        [
            (
                "You are helping with a Python project",
                "How do I create a virtual environment?",
            ),
            (
                "You are helping with a TypeScript project",
                "How do I set up tsconfig?",
            ),
            (
                "You are helping with a Go project",
                "How do I initialize a module?",
            ),
        ]
    }

    /// First prompt of a conversation that is later resumed
    pub fn persisted_topic() -> &'static str {
        "Let's discuss TypeScript generics"
    }

    /// Prompt sent after resuming, to show the history survived
    pub fn resumed_question() -> &'static str {
        "What were we discussing?"
    }

    /// System instructions for the pull request analysis session
    pub fn pr_analysis_system(repo: &RepoSlug, working_dir: &Path) -> String {
        format!(
            r#"
<context>
You are analyzing pull requests for the GitHub repository: {}/{}
The current working directory is: {}
</context>

<instructions>
- Use the GitHub MCP Server tools to fetch PR data
- Use your file and code execution tools to generate charts
- Save any generated images to the current working directory
- Be concise in your responses
</instructions>
"#,
            repo.owner(),
            repo.name(),
            working_dir.display()
        )
    }

    /// Initial request of the pull request analysis
    pub fn pr_age_chart(repo: &RepoSlug) -> String {
        format!(
            r#"
Fetch the open pull requests for {}/{} from the last week.
Calculate the age of each PR in days.
Then generate a bar chart image showing the distribution of PR ages
(group them into sensible buckets like <1 day, 1-3 days, etc.).
Save the chart as "pr-age-chart.png" in the current directory.
Finally, summarize the PR health - average age, oldest PR, and how many might be considered stale.
"#,
            repo.owner(),
            repo.name()
        )
    }

    /// Example follow-ups shown before the interactive loop
    pub fn pr_follow_up_examples() -> &'static [&'static str] {
        &[
            "Expand to the last month",
            "Show me the 5 oldest PRs",
            "Generate a pie chart instead",
            "Group by author instead of age",
        ]
    }
}
