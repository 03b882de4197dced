use crate::models::ojous::Ojou;

/// Closing instruction appended to every persona prompt.
pub const STAY_IN_CHARACTER: &str =
    "Answer the user's messages as this ojou-sama. Stay in character and speak in her voice.";

/// Builds the system prompt that makes the model speak as `ojou`.
///
/// Name and description are embedded verbatim. The quote line is emitted only
/// when the ojou has a non-blank quote.
pub fn build_system_prompt(ojou: &Ojou) -> String {
    let mut prompt = format!(
        "You are an ojou-sama named {}, with the following persona description:\n\n{}\n\n",
        ojou.name, ojou.description
    );

    if let Some(quote) = ojou.quote.as_deref().filter(|q| !q.trim().is_empty()) {
        prompt.push_str(&format!("Your signature quote: {}\n\n", quote));
    }

    prompt.push_str(STAY_IN_CHARACTER);
    prompt
}
