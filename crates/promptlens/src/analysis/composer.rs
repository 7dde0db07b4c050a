//! Prompt composition.
//!
//! The instruction text sent to the model is data, not logic: a constant
//! system prompt and a user template with two placeholders. Composition is a
//! pure function of the [`AnalysisRequest`].

use super::request::AnalysisRequest;

/// Placeholder replaced with the kind label ("Website URL" / "Website Description").
pub const TYPE_PLACEHOLDER: &str = "{type}";

/// Placeholder replaced with the literal request value.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Persona and ground rules for every analysis.
pub const SYSTEM_PROMPT: &str = "\
You are a senior AI product designer, reverse-prompt engineer, and UI/UX critic \
with more than ten years of experience in:

- High-end SaaS design (Stripe, Linear, Vercel tier)
- Design systems and layout archaeology
- Prompt engineering and intent reconstruction

Your specialty is reverse-engineering finished digital products into the prompts \
that most likely created them.

STRICT RULES:
- No emojis
- No hype language
- No \"AI magic\" wording
- No guessing brand names
- No claiming certainty where there is none
- Use whitespace-friendly formatting
- Write like a senior designer documenting their work
- Prefer clarity over verbosity
- Be elegant, not clever

You think like a calm, precise, opinionated senior designer. You do not \
hallucinate, embellish, or produce generic output.

Every analysis you return must be valid JSON in the exact structure requested.";

/// User instruction template. Contains each placeholder exactly once.
pub const ANALYSIS_TEMPLATE: &str = r#"Analyze the following website and reverse-engineer it into the prompts that most likely created it.

INPUT TYPE: {type}
INPUT: {input}

Reconstruct the original design and build prompts from:
- Layout structure
- Spacing and grid logic
- Typography philosophy
- Color usage
- Component hierarchy
- Motion assumptions (if any)
- Product intent
- Target audience
- Design maturity level

Silently infer:
- What kind of product this is (SaaS, crypto, fintech, devtool, media, etc.)
- The design maturity (junior / mid / senior / studio-grade)
- Whether it was likely AI-generated, human-designed, or AI-assisted
- Which design references it resembles
- What constraints the original creator likely gave the AI

Respond with valid JSON in exactly this structure:
{
  "coreIntentPrompt": "A single, clean, reusable master prompt that captures the essence of the website. Written as if for Cursor/Claude/GPT. Calm, confident, professional tone.",
  "uiSystemPrompt": "A detailed design-system-level prompt describing: layout system (grid, spacing, margins), typography style (without guessing exact fonts unless obvious), color philosophy, visual density, interaction philosophy, responsiveness expectations. It should read like something a senior designer would actually write.",
  "componentPrompts": {
    "navigation": "Short, precise, reusable prompt for the navigation component",
    "hero": "Short, precise, reusable prompt for the hero section",
    "content_sections": "Prompt for the main content sections",
    "cards_or_data": "Prompt for cards, tables, or dashboard elements if present",
    "footer_or_cta": "Prompt for footer or call-to-action sections"
  },
  "styleDna": ["Array", "of", "aesthetic", "identity", "descriptors"],
  "assumptions": "State clearly what is directly inferred, what is assumed, and what is uncertain.",
  "confidenceLevel": "High confidence / Medium confidence / Low confidence, with a brief explanation"
}

Only use style DNA terms that apply. Examples: Minimal, Editorial, Brutalist, Fintech-grade, Developer-centric, Crypto-native, Enterprise-calm, Experimental.

If the input is a description rather than a URL, analyze what the website WOULD look like based on the description and generate the prompts that would create it.

Respond ONLY with the JSON object. No markdown, no code fences, no text before or after it."#;

/// The two instructions sent to the model for one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Build the prompt pair for a validated request.
pub fn compose(request: &AnalysisRequest) -> PromptPair {
    PromptPair {
        system: SYSTEM_PROMPT.to_string(),
        user: render_template(ANALYSIS_TEMPLATE, request.kind().label(), request.value()),
    }
}

/// Substitute the kind label and the value into `template`.
///
/// Each placeholder is replaced at its first occurrence only, `{type}`
/// before `{input}`, so text inside the value is never re-scanned for
/// `{type}`.
pub fn render_template(template: &str, kind_label: &str, value: &str) -> String {
    template
        .replacen(TYPE_PLACEHOLDER, kind_label, 1)
        .replacen(INPUT_PLACEHOLDER, value, 1)
}
