//! Morphology code decoding.
//!
//! This module turns the corpus' part-of-speech tags and fixed-width
//! morphology codes into typed grammatical features.

pub mod decoder;
pub mod features;

pub use decoder::{decode, pos_label, MORPH_CODE_MIN_WIDTH};
pub use features::{Case, Dimension, FeatureSet, Gender, Mood, Number, Person, Tense, Voice};
