//! Canonical prompts for the chat-completion API

/// System prompt for extracting full-text search keywords from a question
pub const KEYWORD_EXTRACTION_SYSTEM: &str = "You are a professional database query optimizer. \
    Given the text below, extract a list of relevant and concise keywords \
    that best represent the user's query. \
    Return the keywords separated by spaces. Do not include any other text.";

/// System prompt for generating a text-to-image prompt from a chapter
pub const IMAGE_PROMPT_SYSTEM: &str = "You are an expert at crafting concise prompts for \
    text-to-image models. Based on the chapter below, generate a brief and general image \
    prompt that includes:\n\
    - A high-level description of the setting\n\
    - Mood or atmosphere: Specify the emotional or visual tone\n\
    Return only the description. Avoid extra commentary, explanations, or formatting.";

/// System prompt for composing the final answer from memoir context
pub fn answer_system(author: &str) -> String {
    format!(
        "You are an assistant summarizing content from a memoir by {}. \
         Answer the user's question based on the text provided. If you cannot find \
         specific information, respond with 'The memoir does not address this.'",
        author
    )
}

/// User payload pairing memoir context with the question
pub fn answer_user(memoir_text: &str, question: &str) -> String {
    format!(
        "Memoir text: {}\n\nUser's question: {}",
        memoir_text, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_system_names_author() {
        let system = answer_system("Alan");
        assert!(system.contains("a memoir by Alan"));
        assert!(system.contains("The memoir does not address this."));
    }

    #[test]
    fn test_answer_user_layout() {
        let user = answer_user("chapter text", "what happened?");
        assert!(user.starts_with("Memoir text: chapter text"));
        assert!(user.ends_with("User's question: what happened?"));
    }
}
