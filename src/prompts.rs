// Prompt wording for story generation.

use crate::models::{AgeCategory, StoryChoices};

fn reader(category: AgeCategory) -> &'static str {
    match category {
        AgeCategory::Child => "a child",
        AgeCategory::Teenager => "a teenager",
        AgeCategory::Adult => "an adult",
    }
}

pub fn story_prompt(choices: &StoryChoices) -> String {
    format!(
        r#"Write a short {theme} story suitable for {reader} (age {age}). The main character should be {gender}.

- Make the story engaging and age-appropriate, around 300-500 words long.
- Include vivid descriptions and dialogue to make it interesting.
- Give the story a short title on its first line.
- Add a few emojis to keep the reader engaged."#,
        theme = choices.theme,
        reader = reader(choices.age.category()),
        age = choices.age.years(),
        gender = choices.gender,
    )
}

/// Fills a user supplied template. Unknown placeholders are left as they are.
pub fn render_template(template: &str, choices: &StoryChoices) -> String {
    template
        .replace("{theme}", choices.theme.as_str())
        .replace("{age_category}", choices.age.category().as_str())
        .replace("{age}", &choices.age.years().to_string())
        .replace("{gender}", choices.gender.as_str())
}
