//! # API crate — auth gate and generative AI client for Dynapix
//!
//! This crate sits between the screens and the `store` crate. It owns the two
//! service objects the screens construct once at startup and share by handle:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Mock authentication: current-user slot, observer notification, sign-in/sign-up/sign-out, profile updates, account deletion |
//! | [`gemini`] | Generative Language API client: prompt text generation, image generation, guided-ideation chat |
//! | [`catalog`] | Fixed prompt-builder vocabularies and chat openers |
//!
//! Persistence itself (collections, editing sessions, undo/redo history)
//! lives in the `store` crate; this crate gates and enriches it.

pub mod auth;
pub mod catalog;
pub mod gemini;

pub use auth::{avatar_data_uri, AuthError, AuthService, ProfileUpdate, Subscription};
pub use gemini::{
    extract_final_prompt, AspectRatio, ChatMessage, ChatRole, ChatSession, GeminiClient,
    GenerationError, PromptGenerationParams, IDEATOR_SYSTEM_INSTRUCTION,
};
