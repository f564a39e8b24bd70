//! Persona prompt value object

/// Fixed instruction text that frames every image consultation.
const PERSONA_INSTRUCTION: &str = r#"As a professional doctor, please evaluate the provided image for any medical abnormalities based on your expertise.
Describe any potential issues you observe, provide a differential diagnosis, and suggest appropriate remedies or next steps for management,
addressing me directly as the patient in a clear and concise manner.
Keep your response in a single paragraph, in max 3 sentences, starting directly with your assessment (e.g., "Based on what I see, I suspect...").
Avoid using numbers, special characters, or phrases like "in the image", and maintain a professional,
human-like tone as if speaking to a real patient, without referencing AI or technology.
"#;

/// The process-wide persona. Never parameterised per request; the only
/// per-request input is the transcript appended after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersonaPrompt;

impl PersonaPrompt {
    pub const fn content(&self) -> &'static str {
        PERSONA_INSTRUCTION
    }

    /// Build the vision query: persona text followed by the caller's words.
    pub fn compose(&self, transcript: &str) -> String {
        let mut query = String::with_capacity(PERSONA_INSTRUCTION.len() + transcript.len());
        query.push_str(PERSONA_INSTRUCTION);
        query.push_str(transcript);
        query
    }
}
