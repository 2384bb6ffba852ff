/// Gravatar URL derivation
///
/// Every registered user gets an avatar URL computed from their email
/// address. The URL is a pure function of the email and the options: no
/// network calls are made and identical input always yields the same URL.
///
/// The email is trimmed and lowercased before hashing, matching how Gravatar
/// identifies accounts, and hashed with SHA-256.
///
/// # Example
///
/// ```
/// use connector_shared::avatar::{gravatar_url, AvatarOptions};
///
/// let url = gravatar_url("ada@example.com", &AvatarOptions::default());
/// assert!(url.starts_with("https://www.gravatar.com/avatar/"));
/// assert!(url.ends_with("?s=200&r=pg&d=mm"));
/// ```

use sha2::{Digest, Sha256};
use std::fmt;

/// Base URL for Gravatar image requests
pub const GRAVATAR_BASE_URL: &str = "https://www.gravatar.com/avatar";

/// Maximum audience rating of images Gravatar may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    /// Suitable for all audiences
    G,
    /// May contain rude gestures or mild violence
    Pg,
    /// May contain harsh profanity or intense violence
    R,
    /// May contain sexual imagery
    X,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::G => "g",
            Rating::Pg => "pg",
            Rating::R => "r",
            Rating::X => "x",
        }
    }
}

/// Image served when the email has no Gravatar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultImage {
    /// Return HTTP 404 instead of an image
    NotFound,
    /// Mystery person silhouette
    MysteryPerson,
    Identicon,
    MonsterId,
    Wavatar,
    Retro,
    RoboHash,
    /// Transparent PNG
    Blank,
}

impl DefaultImage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultImage::NotFound => "404",
            DefaultImage::MysteryPerson => "mm",
            DefaultImage::Identicon => "identicon",
            DefaultImage::MonsterId => "monsterid",
            DefaultImage::Wavatar => "wavatar",
            DefaultImage::Retro => "retro",
            DefaultImage::RoboHash => "robohash",
            DefaultImage::Blank => "blank",
        }
    }
}

/// Query parameters appended to the avatar URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarOptions {
    /// Image size in pixels (`s`)
    pub size: u32,

    /// Maximum rating (`r`)
    pub rating: Rating,

    /// Fallback image (`d`)
    pub default: DefaultImage,
}

impl Default for AvatarOptions {
    /// 200px, rated pg, mystery-person fallback
    fn default() -> Self {
        Self {
            size: 200,
            rating: Rating::Pg,
            default: DefaultImage::MysteryPerson,
        }
    }
}

impl fmt::Display for AvatarOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "s={}&r={}&d={}",
            self.size,
            self.rating.as_str(),
            self.default.as_str()
        )
    }
}

/// Hex-encoded SHA-256 of the normalized email
pub fn email_hash(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Builds the Gravatar URL for `email`
pub fn gravatar_url(email: &str, options: &AvatarOptions) -> String {
    format!("{}/{}?{}", GRAVATAR_BASE_URL, email_hash(email), options)
}
