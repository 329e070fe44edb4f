//! Prompt templates for every backend call a session makes

/// Templates for generating prompts at each stage of a round
pub struct PromptTemplate;

impl PromptTemplate {
    /// Assistant turn placed right after an actor's instructions
    pub fn stay_in_character_ack() -> &'static str {
        "OK, I will stay in character no matter what."
    }

    /// Assistant turn recalling memory and the previous round.
    ///
    /// `None` when there is nothing to recall.
    pub fn memory_preamble(memory: &str, last_transcript: Option<&str>) -> Option<String> {
        let mut preamble = String::new();
        if !memory.is_empty() {
            preamble.push_str(&format!("Here is my memory: {}\n", memory));
        }
        if let Some(transcript) = last_transcript {
            preamble.push_str(&format!("Here is our last conversation: {}\n", transcript));
        }
        (!preamble.is_empty()).then_some(preamble)
    }

    /// Nudge appended after the transcript for a non-primary member
    pub fn turn_nudge() -> &'static str {
        "Now it's your turn to respond. You can: \
1) reply to user query only and ignore other AIs; \
2) chat with other AIs only and ignore the user; \
3) try to have a conversation with both the user and AIs."
    }

    /// Frames another actor's turn for the one about to speak
    pub fn other_actor_turn(display_name: &str, text: &str) -> String {
        format!(
            "Here are the conversations from another AI that play as {}: {}",
            display_name, text
        )
    }

    /// Ask the backend to fold previous memory and the last round into a summary
    pub fn summarize_memory(memory: &str, last_transcript: Option<&str>) -> String {
        let mut prompt = String::new();
        if !memory.is_empty() {
            prompt.push_str(&format!("Here is your previous memory: {}\n", memory));
        }
        if let Some(transcript) = last_transcript {
            prompt.push_str(&format!(
                "Here is the last conversation we had: {}\n",
                transcript
            ));
        }
        prompt.push_str(
            "Summarize the above interactions. Keep it as short as possible. \
Skip all details and only retain the major events.",
        );
        prompt
    }

    /// Structured-choice prompt asked of each judge
    pub fn judge_prompt(judge_name: &str, input: &str, pool_names: &[String]) -> String {
        format!(
            r#"As {judge_name}, analyze the current conversation situation:

USER REQUEST: "{input}"

CURRENT CHARACTERS: {characters}

In most cases, there should be 1~3 characters in the conversation.
In rare cases, there should be 3~5 characters in the conversation.
There should not be more than 5 characters in the conversation.
Each character speaks in order.
The characters should be well-balanced and diverse.

Based on these rules, choose ONE of the following actions that best fits the user's request:

1. KEEP - If the current characters are well-suited to handle the user's request and should continue the conversation.

2. REMOVE: [character name(s)] - If specific character(s) are inappropriate for this conversation or are not contributing meaningfully. Only remove characters when absolutely necessary.

3. SHUFFLE - If the current characters should remain but their speaking order should be changed to improve the conversation flow.

4. ADD_NEW - If a new character with different expertise or personality would help address the user's request.

5. FIND_POPULAR - If the user's request would be best handled by characters that have been frequently used in past conversations.

RESPOND WITH EXACTLY ONE OF:
- KEEP
- REMOVE: [character name(s)]
- SHUFFLE
- ADD_NEW
- FIND_POPULAR

DO NOT include any explanation or reasoning in your response."#,
            judge_name = judge_name,
            input = input,
            characters = pool_names.join(","),
        )
    }

    /// Ask for the single persona best suited to a request
    pub fn pick_persona(task: &str) -> String {
        format!(
            "From movies / TV shows / books / video games / internet, choose one character who is MOST qualified for user's request: {}. Only output the character name.",
            task
        )
    }

    /// Ask for instructions that make the backend play `name`
    pub fn draft_instructions(name: &str) -> String {
        format!("Give a short system prompt for LLM to act like {}.", name)
    }

    pub fn impersonation_note(real_name: &str, display_name: &str) -> String {
        format!(
            "{} decided act as {} to cause confusion and chaos for fun.",
            real_name, display_name
        )
    }

    /// Synthetic turn broadcast after membership changes
    pub fn event_note(events: &str) -> String {
        format!("The following events happened: {}", events)
    }

    pub fn members_left(names: &[String]) -> String {
        format!("{} left the conversation.", names.join(", "))
    }

    pub fn member_joined(name: &str) -> String {
        format!("{} joined the conversation.", name)
    }

    pub fn popular_joined(names: &[String]) -> String {
        format!(
            "Popular characters joined the conversation: {}",
            names.join(", ")
        )
    }

    /// Merge independent judge answers into one verdict
    pub fn panel_synthesis(input: &str, answers: &[(String, String)]) -> String {
        let combined = answers
            .iter()
            .map(|(judge, answer)| format!("MAGI-{}: {}", judge, answer))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are the MAGI supercomputer system from Neon Genesis Evangelion.

The three MAGI supercomputers have analyzed the following query:
"{}"

Here are their responses:
{}

As the unified MAGI system, synthesize these perspectives into ONE clear, concise decision or recommendation (maximum 2-3 sentences).
Use technical, formal language in the style of NERV's computer systems. Include a simple "APPROVED" or "DENIED" status if appropriate."#,
            input, combined
        )
    }
}
