/*!
 * Tests for line classification and placeholder masking
 */

use pdxloc::scanner::{self, LineClass, RegionState};

#[test]
fn test_mask_withDollarToken_shouldExtractToken() {
    let masked = scanner::mask("Hello $PLAYER$");
    assert_eq!(masked.text, "Hello [VAR_0]");
    assert_eq!(masked.tokens, vec!["$PLAYER$".to_string()]);
}

#[test]
fn test_mask_withAllTokenFamilies_shouldExtractEach() {
    let masked = scanner::mask("[Root.GetName] says $GREETING$ to @ally! in #bold text#!");
    assert!(masked.tokens.contains(&"[Root.GetName]".to_string()));
    assert!(masked.tokens.contains(&"$GREETING$".to_string()));
    assert!(masked.tokens.contains(&"@ally!".to_string()));
    assert!(masked.tokens.contains(&"#bold".to_string()));
    assert!(masked.tokens.contains(&"#!".to_string()));
    assert!(!masked.text.contains('$'));
    assert!(!masked.text.contains('@'));
}

#[test]
fn test_mask_withNoTokens_shouldLeaveTextAlone() {
    let masked = scanner::mask("Just a plain sentence.");
    assert_eq!(masked.text, "Just a plain sentence.");
    assert!(masked.tokens.is_empty());
}

#[test]
fn test_unmask_withIntactSentinels_shouldRestoreTokens() {
    let masked = scanner::mask("Hello $PLAYER$, see [icon]");
    let restored = scanner::unmask(&masked.text, &masked.tokens);
    assert_eq!(restored, "Hello $PLAYER$, see [icon]");
}

#[test]
fn test_unmask_withDamagedSentinelBrackets_shouldStillRestore() {
    let tokens = vec!["$PLAYER$".to_string()];
    assert_eq!(scanner::unmask("Bonjour VAR_0", &tokens), "Bonjour $PLAYER$");
    assert_eq!(scanner::unmask("Bonjour [ VAR_0 ]", &tokens), "Bonjour $PLAYER$");
}

#[test]
fn test_unmask_withOutOfRangeIndex_shouldLeaveSentinel() {
    let tokens = vec!["$PLAYER$".to_string()];
    assert_eq!(scanner::unmask("[VAR_7]", &tokens), "[VAR_7]");
}

#[test]
fn test_missingTokens_withDroppedSentinel_shouldReportIndex() {
    let masked = scanner::mask("$A$ and $B$");
    assert_eq!(masked.tokens.len(), 2);
    // Backend dropped the second sentinel entirely
    let missing = scanner::missing_tokens("[VAR_0] et", &masked.tokens);
    assert_eq!(missing, vec![1]);
}

#[test]
fn test_missingTokens_withAllPresent_shouldReportNone() {
    let masked = scanner::mask("$A$ and $B$");
    let missing = scanner::missing_tokens("[VAR_1] puis [VAR_0]", &masked.tokens);
    assert!(missing.is_empty());
}

#[test]
fn test_isTagOnly_withOnlyPlaceholders_shouldBeTrue() {
    let masked = scanner::mask("[frame]");
    assert!(scanner::is_tag_only(&masked.text));
}

#[test]
fn test_isTagOnly_withPlaceholdersAndPunctuation_shouldBeTrue() {
    let masked = scanner::mask("[icon], [frame]!");
    assert!(scanner::is_tag_only(&masked.text));
}

#[test]
fn test_isTagOnly_withEmptyValue_shouldBeTrue() {
    assert!(scanner::is_tag_only(""));
    assert!(scanner::is_tag_only("   "));
}

#[test]
fn test_isTagOnly_withRealText_shouldBeFalse() {
    let masked = scanner::mask("Hello $PLAYER$");
    assert!(!scanner::is_tag_only(&masked.text));
}

#[test]
fn test_classify_withPlainText_shouldBeTranslatable() {
    let region = RegionState::new();
    assert_eq!(scanner::classify("Hello there", "", &region), LineClass::Translatable);
}

#[test]
fn test_classify_withSkipComment_shouldBeSkipMarked() {
    let region = RegionState::new();
    let class = scanner::classify("Hello there", " # NO_TRANSLATE", &region);
    assert_eq!(class, LineClass::SkipMarked);
}

#[test]
fn test_classify_withOpenRegion_shouldBeRegionSkip() {
    let mut region = RegionState::new();
    region.observe("# NO_TRANSLATE BELOW");
    let class = scanner::classify("Hello there", "", &region);
    assert_eq!(class, LineClass::RegionSkip);
}

#[test]
fn test_regionState_withEndMarker_shouldClose() {
    let mut region = RegionState::new();
    assert!(region.observe("# NO_TRANSLATE BELOW"));
    assert!(region.active());
    assert!(region.observe("# NO_TRANSLATE END"));
    assert!(!region.active());
}

#[test]
fn test_regionState_withNestedStartMarker_shouldNotNest() {
    let mut region = RegionState::new();
    region.observe("# NO_TRANSLATE BELOW");
    // A second start inside an open region is inert
    region.observe("# NO_TRANSLATE BELOW");
    region.observe("# NO_TRANSLATE END");
    assert!(!region.active());
}

#[test]
fn test_regionState_withPlainLine_shouldNotBeMarker() {
    let mut region = RegionState::new();
    assert!(!region.observe(" KEY: \"value\" # some comment"));
    assert!(!region.active());
}

#[test]
fn test_isLocked_withLockComment_shouldBeTrue() {
    assert!(scanner::is_locked(" # LOCK"));
    assert!(scanner::is_locked(" # LOCKED by translator"));
    assert!(!scanner::is_locked(" # just a note"));
    assert!(!scanner::is_locked(""));
}

#[test]
fn test_cleanup_withSpaceBeforePunctuation_shouldRemoveIt() {
    assert_eq!(scanner::cleanup("Bonjour , monde ."), "Bonjour, monde.");
}

#[test]
fn test_cleanup_withDoubleSpaces_shouldCollapse() {
    assert_eq!(scanner::cleanup("Bonjour  le   monde"), "Bonjour le monde");
}

#[test]
fn test_cleanup_withDoubledBrackets_shouldCollapse() {
    assert_eq!(scanner::cleanup("[[icon]] text"), "[icon] text");
}
