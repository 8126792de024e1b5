//! Fixed vocabularies for the prompt-builder screen and the ideation
//! openers. Option lists whose first entry is `"Default"` mean "no
//! preference" and are omitted from the generated instruction.

/// A canned conversation opener for the ideation chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreativeSpark {
    pub title: &'static str,
    pub description: &'static str,
    /// First chat message; empty means "start from scratch".
    pub prompt: &'static str,
}

pub const PROMPT_CATEGORIES: &[&str] = &[
    "Photography",
    "Design",
    "Business",
    "Art",
    "Logos",
    "Fashion",
    "Architecture",
    "Lifestyle",
    "Technology",
    "Nature",
];

pub const PROMPT_STYLES: &[&str] = &[
    "Photorealistic",
    "Minimalist",
    "Cyberpunk",
    "Vintage",
    "Abstract",
    "Surreal",
    "Impressionistic",
    "Art Deco",
    "Vaporwave",
    "Cinematic",
];

pub const PROMPT_MOODS: &[&str] = &[
    "Default",
    "Cinematic",
    "Dramatic",
    "Ethereal",
    "Gloomy",
    "Joyful",
    "Mysterious",
    "Ominous",
    "Peaceful",
    "Energetic",
];

pub const PROMPT_COMPOSITIONS: &[&str] = &[
    "Default",
    "Close-up",
    "Wide Shot",
    "Portrait",
    "Landscape",
    "Dutch Angle",
    "Symmetrical",
    "Rule of Thirds",
    "Birds-eye View",
];

pub const PROMPT_LIGHTING: &[&str] = &[
    "Default",
    "Golden Hour",
    "Blue Hour",
    "Neon Glow",
    "Backlighting",
    "Soft Light",
    "Studio Lighting",
    "Moonlight",
    "High-contrast",
];

pub const CREATIVE_SPARKS: &[CreativeSpark] = &[
    CreativeSpark {
        title: "Character Design",
        description: "Create a unique character",
        prompt: "I want to design a new character.",
    },
    CreativeSpark {
        title: "Surreal Landscape",
        description: "Imagine a dreamlike world",
        prompt: "Help me create a surreal landscape.",
    },
    CreativeSpark {
        title: "Sci-Fi Concept",
        description: "Invent futuristic technology",
        prompt: "Let's brainstorm a sci-fi concept.",
    },
    CreativeSpark {
        title: "Start from Scratch",
        description: "Begin with your own idea",
        prompt: "",
    },
];
