use super::dto::MeditationPrompt;

pub const SYSTEM_MESSAGE: &str = "You are an expert meditation guide who creates personalized, \
transformative quantum healing meditation experiences.";

/// User prompt asking the language model for a three-part script.
pub fn build_prompt(prompt: &MeditationPrompt, delimiter: &str) -> String {
    let instructions = prompt
        .additional_instruction
        .as_deref()
        .unwrap_or("none");

    format!(
        r#"Create a personalized quantum healing meditation script with the following specifications:
- Condition to address: {disease}
- Specific symptom: {symptom}
- Additional instructions: {instructions}

Structure the meditation into exactly 3 sections:
1. Arrival and grounding
2. Deep healing visualization focused on the symptom
3. Integration, gratitude and gentle return

Separate the sections with the marker {delimiter} on its own line. Use the marker exactly twice
and do not use it anywhere else.

Make the meditation deeply personal and tailored to the listener's needs.
Include breathing exercises, visualization, and mindfulness techniques.

Use these voice cues where they help the pacing:
- [inhale] and [exhale] for guided breathing
- [pause 5 seconds] for longer silences
- [whisper] for softly spoken lines
- <break time="2s"/> for short pauses

Example: "Take a deep breath [inhale] <break time="3s"/> and feel the calm flowing through your body [exhale].""#,
        disease = prompt.disease,
        symptom = prompt.symptom,
        instructions = instructions,
        delimiter = delimiter,
    )
}

/// Canned three-section script used when no language model is configured.
pub fn mock_script(prompt: &MeditationPrompt, delimiter: &str) -> String {
    let disease = prompt.disease.to_lowercase();
    let symptom = prompt.symptom.to_lowercase();

    format!(
        r#"**Welcome to Your Personal Healing Journey**

Take a moment to settle into this space. <break time="3s"/> Feel the weight of your body supported by the surface beneath you. [inhale] Breathe deeply and allow yourself to arrive fully in this moment. [exhale]

As we begin this meditation for {disease}, notice how you're feeling right now. There's no need to change anything - simply observe with gentle curiosity.
{delimiter}
**Deepening Your Practice**

Now imagine a warm, golden light surrounding your body. [pause 5 seconds] This light carries the calm and healing you're cultivating within.

*Feel this light gently reaching the places where you notice {symptom}*, softening and releasing with every breath. <break time="3s"/>

[whisper] Allow any thoughts or sensations to arise and pass like clouds in a vast sky. You are the sky - vast, open, and unchanging.
{delimiter}
**Integration and Gratitude**

As we gently bring this meditation to a close, take a moment to appreciate yourself for showing up. <break time="2s"/> *You've given yourself the gift of presence.*

Slowly begin to wiggle your fingers and toes. <break time="1s"/> When you're ready, open your eyes and carry this sense of peace with you into your day."#,
        disease = disease,
        symptom = symptom,
        delimiter = delimiter,
    )
}
