//! Face comparison stub for attendance verification.
//!
//! Compares two base64-encoded face images with a cheap structural
//! heuristic: length ratio (weight 0.3) plus sampled character similarity
//! (weight 0.7), scaled to 0-100. A bounded variance term is mixed in to
//! simulate real-world capture noise; it is derived from a digest of both
//! images rather than an RNG so results stay reproducible.
//!
//! A production deployment would replace this with a proper recognition
//! backend (AWS Rekognition, Azure Face API, ...); the service signature is
//! already shaped for that swap.

use sha2::{Digest, Sha256};

use super::analytics::round1;

/// Similarity score (0-100) required to declare a match.
pub const MATCH_THRESHOLD: f64 = 75.0;

/// Minimum base64 payload length accepted as a plausible image.
const MIN_IMAGE_LEN: usize = 1000;

/// Outcome of a face comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceComparison {
    pub matched: bool,
    /// Similarity percentage, one decimal place.
    pub confidence: f64,
}

impl FaceComparison {
    fn no_match() -> Self {
        Self {
            matched: false,
            confidence: 0.0,
        }
    }
}

fn strip_data_url_prefix(image: &str) -> &str {
    if image.starts_with("data:image/") {
        if let Some(idx) = image.find(";base64,") {
            return &image[idx + ";base64,".len()..];
        }
    }
    image
}

/// Bounded variance in `[-10, 10]`, derived from both images.
fn variance(image1: &str, image2: &str) -> f64 {
    let mut hasher = Sha256::new();
    hasher.update(image1.as_bytes());
    hasher.update(image2.as_bytes());
    let digest = hasher.finalize();
    let raw = u16::from_be_bytes([digest[0], digest[1]]);
    (raw % 2001) as f64 / 100.0 - 10.0
}

fn simple_similarity(image1: &str, image2: &str) -> f64 {
    let clean1 = strip_data_url_prefix(image1).as_bytes();
    let clean2 = strip_data_url_prefix(image2).as_bytes();
    if clean1.is_empty() || clean2.is_empty() {
        return 0.0;
    }

    let length_ratio = clean1.len().min(clean2.len()) as f64 / clean1.len().max(clean2.len()) as f64;

    let sample_size = 100.min(clean1.len()).min(clean2.len());
    let interval1 = clean1.len() / sample_size;
    let interval2 = clean2.len() / sample_size;
    let mut matching = 0usize;
    for i in 0..sample_size {
        if clean1[i * interval1] == clean2[i * interval2] {
            matching += 1;
        }
    }
    let char_similarity = matching as f64 / sample_size as f64;

    let similarity = (length_ratio * 0.3 + char_similarity * 0.7) * 100.0;
    (similarity + variance(image1, image2)).clamp(0.0, 100.0)
}

/// Compare a stored reference image against a captured one.
///
/// Empty input yields a zero-confidence non-match instead of an error.
pub fn compare_faces(stored_base64: &str, captured_base64: &str) -> FaceComparison {
    if stored_base64.is_empty() || captured_base64.is_empty() {
        return FaceComparison::no_match();
    }
    let similarity = simple_similarity(stored_base64, captured_base64);
    FaceComparison {
        matched: similarity >= MATCH_THRESHOLD,
        confidence: round1(similarity),
    }
}

/// Check that a payload looks like a base64-encoded image of plausible size.
pub fn validate_face_image(image_base64: &str) -> Result<(), String> {
    if image_base64.is_empty() {
        return Err("Image data is required".to_string());
    }

    let clean = strip_data_url_prefix(image_base64);
    let padding = clean.bytes().rev().take_while(|b| *b == b'=').count();
    if padding > 2
        || !clean[..clean.len() - padding]
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
    {
        return Err("Invalid base64 format".to_string());
    }

    if clean.len() < MIN_IMAGE_LEN {
        return Err("Image is too small".to_string());
    }

    Ok(())
}
