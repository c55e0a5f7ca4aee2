/*!
 * Translation service for localization sync using external providers.
 *
 * This module contains the service layer between the sync engine and the
 * provider clients. It is split into two submodules:
 *
 * - `core`: service definition and provider selection
 * - `cache`: in-run memoization of repeated requests
 */

// Re-export main types for easier usage
pub use self::cache::{CacheStats, TranslationCache};
pub use self::core::TranslationService;

// Submodules
pub mod cache;
pub mod core;
