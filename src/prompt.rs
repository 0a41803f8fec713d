use crate::models::Turn;

const PERSONA: &str = "You are the virtual support assistant of this company. \
Your tone is professional, friendly and helpful.";

/// Renders turns in the order given as `User:` / `Assistant:` lines.
pub fn render_history(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|turn| format!("User: {}\nAssistant: {}\n", turn.user_message, turn.bot_response))
        .collect()
}

pub fn construct_prompt(context: &str, history: &str, query: &str) -> String {
    format!(
        "{PERSONA}

**Company context (FAQs):**
{context}

**Recent conversation history:**
{history}

**Latest user question:** {query}

**Instructions:**
1. Answer the latest user question using **only** the context and history provided.
2. If the information is not enough, politely ask for more details. Never make up facts about the company.
3. If the user asks about something unrelated, courteously steer the conversation back to the company's services.
4. Keep answers clear and concise.
"
    )
}

pub fn construct_intent_prompt(query: &str) -> String {
    format!(
        "In one short sentence (at most 10 words), summarize the user's main need based on their message: \"{query}\""
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(user: &str, bot: &str) -> Turn {
        Turn {
            user_message: user.to_string(),
            bot_response: bot.to_string(),
        }
    }

    #[test]
    fn test_render_history() {
        let history = render_history(&[turn("hi", "hello!"), turn("hours?", "9 to 5")]);
        assert_eq!(
            history,
            "User: hi\nAssistant: hello!\nUser: hours?\nAssistant: 9 to 5\n"
        );
        assert_eq!(render_history(&[]), "");
    }

    #[test]
    fn test_prompt_embeds_all_parts() {
        let prompt = construct_prompt("Question: a\nAnswer: b", "User: x\nAssistant: y\n", "what now?");
        assert!(prompt.starts_with(PERSONA));
        assert!(prompt.contains("Question: a\nAnswer: b"));
        assert!(prompt.contains("User: x\nAssistant: y"));
        assert!(prompt.contains("**Latest user question:** what now?"));
        assert!(prompt.contains("Never make up facts"));

        let context_at = prompt.find("Question: a").unwrap();
        let history_at = prompt.find("User: x").unwrap();
        let query_at = prompt.find("what now?").unwrap();
        assert!(context_at < history_at && history_at < query_at);
    }

    #[test]
    fn test_intent_prompt_quotes_message() {
        let prompt = construct_intent_prompt("I need an invoice copy");
        assert!(prompt.contains("at most 10 words"));
        assert!(prompt.ends_with("\"I need an invoice copy\""));
    }
}
