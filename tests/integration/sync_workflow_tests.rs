/*!
 * End-to-end localization sync workflow tests
 *
 * These tests drive the full file-level flow the way a run does: read the
 * source tree, sync per target language, write BOM'd output files, and
 * persist the fingerprint store between runs.
 */

use std::path::{Path, PathBuf};

use pdxloc::file_utils::{FileManager, UTF8_BOM};
use pdxloc::hash_store::HashStore;
use pdxloc::loc_file::LocFile;
use pdxloc::providers::mock::MockBackend;
use pdxloc::sync::{SyncEngine, SyncReport};
use pdxloc::translation::TranslationService;

use crate::common::{create_temp_dir, create_test_file, english, french, german};

/// One sync pass over a source tree for one target language
async fn sync_tree(
    engine: &mut SyncEngine,
    loc_root: &Path,
    target: &'static pdxloc::language_utils::GameLanguage,
    store: &mut HashStore,
    report: &mut SyncReport,
) -> anyhow::Result<()> {
    let source_root = loc_root.join("english");
    for file in FileManager::find_localization_files(&source_root)? {
        let source = LocFile::parse(&FileManager::read_to_string(&file)?);

        let target_path = FileManager::target_path_for(
            &file,
            &source_root,
            &loc_root.join(target.folder),
            english(),
            target,
        )?;

        let existing_content = if target_path.exists() {
            Some(FileManager::read_to_string(&target_path)?)
        } else {
            None
        };
        let existing = existing_content.as_deref().map(LocFile::parse);

        let built = engine.sync_file(&source, existing.as_ref(), target, store, report).await;
        let rendered = built.render();
        if existing_content.as_deref() != Some(rendered.as_str()) {
            FileManager::write_localization(&target_path, &rendered)?;
        }
    }
    Ok(())
}

fn write_source(loc_root: &PathBuf, name: &str, content: &str) -> PathBuf {
    create_test_file(&loc_root.join("english"), name, content).unwrap()
}

#[tokio::test]
async fn test_workflow_withSpecExample_shouldTranslateAndCopy() {
    let dir = create_temp_dir().unwrap();
    let loc_root = dir.path().to_path_buf();
    write_source(&loc_root, "ui_l_english.yml", concat!(
        "l_english:\n",
        " GREETING: \"Hello $PLAYER$\"\n",
        " ONLY_TAG: \"[frame]\"\n",
    ));

    let mock = MockBackend::working();
    let counter = mock.clone();
    let mut engine = SyncEngine::new(TranslationService::with_backend(Box::new(mock)), english());
    let mut store = HashStore::load(loc_root.join("hashes.json")).unwrap();
    let mut report = SyncReport::default();

    sync_tree(&mut engine, &loc_root, french(), &mut store, &mut report).await.unwrap();
    store.save().unwrap();

    // Output file exists under the french folder with the rewritten name
    let output = loc_root.join("french/ui_l_french.yml");
    assert!(output.exists());

    let raw = std::fs::read_to_string(&output).unwrap();
    assert!(raw.starts_with(UTF8_BOM));

    let content = FileManager::read_to_string(&output).unwrap();
    assert!(content.starts_with("l_french:"));
    // Token preserved, tag-only line copied verbatim without a call
    assert!(content.contains("$PLAYER$"));
    assert!(content.contains(" ONLY_TAG: \"[frame]\""));
    assert_eq!(counter.calls(), 1);
}

#[tokio::test]
async fn test_workflow_withSecondRun_shouldBeByteIdenticalWithZeroCalls() {
    let dir = create_temp_dir().unwrap();
    let loc_root = dir.path().to_path_buf();
    write_source(&loc_root, "ui_l_english.yml", concat!(
        "l_english:\n",
        " GREETING: \"Hello $PLAYER$\"\n",
        " # a comment kept verbatim\n",
        " FAREWELL: \"Goodbye\"\n",
    ));
    let store_path = loc_root.join("hashes.json");

    // First run
    {
        let mut engine = SyncEngine::new(
            TranslationService::with_backend(Box::new(MockBackend::working())),
            english(),
        );
        let mut store = HashStore::load(&store_path).unwrap();
        let mut report = SyncReport::default();
        sync_tree(&mut engine, &loc_root, french(), &mut store, &mut report).await.unwrap();
        store.save().unwrap();
    }

    let output = loc_root.join("french/ui_l_french.yml");
    let bytes_first = std::fs::read(&output).unwrap();
    let store_bytes_first = std::fs::read(&store_path).unwrap();

    // Second run, fresh engine and reloaded store
    let mock = MockBackend::working();
    let counter = mock.clone();
    {
        let mut engine = SyncEngine::new(TranslationService::with_backend(Box::new(mock)), english());
        let mut store = HashStore::load(&store_path).unwrap();
        let mut report = SyncReport::default();
        sync_tree(&mut engine, &loc_root, french(), &mut store, &mut report).await.unwrap();
        store.save().unwrap();
        assert_eq!(report.translated, 0);
    }

    assert_eq!(counter.calls(), 0);
    assert_eq!(std::fs::read(&output).unwrap(), bytes_first);
    assert_eq!(std::fs::read(&store_path).unwrap(), store_bytes_first);
}

#[tokio::test]
async fn test_workflow_withPartialFailure_shouldKeepOtherEntriesAndRetry() {
    let dir = create_temp_dir().unwrap();
    let loc_root = dir.path().to_path_buf();
    write_source(&loc_root, "ui_l_english.yml", concat!(
        "l_english:\n",
        " FIRST: \"Alpha text\"\n",
        " SECOND: \"Beta text\"\n",
        " THIRD: \"Gamma text\"\n",
    ));
    let store_path = loc_root.join("hashes.json");

    // Backend fails exactly on the second request
    {
        let mut engine = SyncEngine::new(
            TranslationService::with_backend(Box::new(MockBackend::intermittent(2))),
            english(),
        );
        let mut store = HashStore::load(&store_path).unwrap();
        let mut report = SyncReport::default();
        sync_tree(&mut engine, &loc_root, french(), &mut store, &mut report).await.unwrap();
        store.save().unwrap();

        assert_eq!(report.translated, 2);
        assert_eq!(report.failed, 1);
    }

    let output = loc_root.join("french/ui_l_french.yml");
    let content = FileManager::read_to_string(&output).unwrap();
    // Failed entry carries the source text as a visible placeholder
    assert!(content.contains("[FR] Alpha text"));
    assert!(content.contains(" SECOND: \"Beta text\""));
    assert!(content.contains("[FR] Gamma text"));

    // Next run retries only the failed entry
    let mock = MockBackend::working();
    let counter = mock.clone();
    {
        let mut engine = SyncEngine::new(TranslationService::with_backend(Box::new(mock)), english());
        let mut store = HashStore::load(&store_path).unwrap();
        let mut report = SyncReport::default();
        sync_tree(&mut engine, &loc_root, french(), &mut store, &mut report).await.unwrap();
        store.save().unwrap();

        assert_eq!(report.translated, 1);
        assert_eq!(report.up_to_date, 2);
    }
    assert_eq!(counter.calls(), 1);

    let content = FileManager::read_to_string(&output).unwrap();
    assert!(content.contains("[FR] Beta text"));
}

#[tokio::test]
async fn test_workflow_withTwoTargets_shouldKeepLanguagesIndependent() {
    let dir = create_temp_dir().unwrap();
    let loc_root = dir.path().to_path_buf();
    write_source(&loc_root, "ui_l_english.yml", "l_english:\n KEY: \"Text\"\n");
    let store_path = loc_root.join("hashes.json");

    let mut engine = SyncEngine::new(
        TranslationService::with_backend(Box::new(MockBackend::working())),
        english(),
    );
    let mut store = HashStore::load(&store_path).unwrap();
    let mut report = SyncReport::default();

    sync_tree(&mut engine, &loc_root, french(), &mut store, &mut report).await.unwrap();
    sync_tree(&mut engine, &loc_root, german(), &mut store, &mut report).await.unwrap();
    store.save().unwrap();

    let french_out = FileManager::read_to_string(loc_root.join("french/ui_l_french.yml")).unwrap();
    let german_out = FileManager::read_to_string(loc_root.join("german/ui_l_german.yml")).unwrap();
    assert!(french_out.starts_with("l_french:"));
    assert!(german_out.starts_with("l_german:"));
    assert!(french_out.contains("[FR] Text"));
    assert!(german_out.contains("[DE] Text"));

    // Per-language fingerprints are independent records
    let store = HashStore::load(&store_path).unwrap();
    assert!(store.get("KEY", "french").is_some());
    assert!(store.get("KEY", "german").is_some());
}

#[tokio::test]
async fn test_workflow_withLockedLineAcrossRuns_shouldSurviveSourceEdits() {
    let dir = create_temp_dir().unwrap();
    let loc_root = dir.path().to_path_buf();
    let source_path = write_source(&loc_root, "ui_l_english.yml", "l_english:\n KEY: \"Original\"\n");
    let store_path = loc_root.join("hashes.json");

    // First run produces a translation; a human then locks and reworks it
    {
        let mut engine = SyncEngine::new(
            TranslationService::with_backend(Box::new(MockBackend::working())),
            english(),
        );
        let mut store = HashStore::load(&store_path).unwrap();
        let mut report = SyncReport::default();
        sync_tree(&mut engine, &loc_root, french(), &mut store, &mut report).await.unwrap();
        store.save().unwrap();
    }
    let output = loc_root.join("french/ui_l_french.yml");
    FileManager::write_localization(&output, "l_french:\n KEY: \"Version humaine\" # LOCK\n").unwrap();

    // Edit the source twice; the locked line must never move
    for edit in ["Edited once", "Edited twice"] {
        std::fs::write(&source_path, format!("l_english:\n KEY: \"{}\"\n", edit)).unwrap();

        let mock = MockBackend::working();
        let counter = mock.clone();
        let mut engine = SyncEngine::new(TranslationService::with_backend(Box::new(mock)), english());
        let mut store = HashStore::load(&store_path).unwrap();
        let mut report = SyncReport::default();
        sync_tree(&mut engine, &loc_root, french(), &mut store, &mut report).await.unwrap();
        store.save().unwrap();

        assert_eq!(counter.calls(), 0);
        let content = FileManager::read_to_string(&output).unwrap();
        assert!(content.contains("Version humaine"));
        assert!(content.contains("# LOCK"));
    }
}

#[tokio::test]
async fn test_workflow_withAuthFailure_shouldKeepCompletedWork() {
    let dir = create_temp_dir().unwrap();
    let loc_root = dir.path().to_path_buf();
    write_source(&loc_root, "ui_l_english.yml", concat!(
        "l_english:\n",
        " ONLY_TAG: \"[frame]\"\n",
        " NEEDS_CALL: \"Some text\"\n",
    ));

    let mut engine = SyncEngine::new(
        TranslationService::with_backend(Box::new(MockBackend::auth_failing())),
        english(),
    );
    let mut store = HashStore::load(loc_root.join("hashes.json")).unwrap();
    let mut report = SyncReport::default();
    sync_tree(&mut engine, &loc_root, french(), &mut store, &mut report).await.unwrap();
    store.save().unwrap();

    assert!(engine.auth_failed());

    // The file was still written completely: verbatim copy plus fallback
    let content = FileManager::read_to_string(loc_root.join("french/ui_l_french.yml")).unwrap();
    assert!(content.contains(" ONLY_TAG: \"[frame]\""));
    assert!(content.contains(" NEEDS_CALL: \"Some text\""));
    // Verbatim-copy fingerprints were committed, the failed entry's was not
    let store = HashStore::load(loc_root.join("hashes.json")).unwrap();
    assert!(store.get("ONLY_TAG", "french").is_some());
    assert!(store.get("NEEDS_CALL", "french").is_none());
}
