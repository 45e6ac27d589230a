//! Integration tests for the storage and chunking pipeline
//!
//! These cover the local half of the system end to end: chapter splitting,
//! indexing at chunk-creation time, ranked retrieval, and the whole-memoir
//! fallback path. The hosted model APIs are not exercised here.

use memoir_rag::storage::Database;
use memoir_rag::text::{ChapterSplitter, sanitize_match_query};

const MEMOIR: &str = "Chapter 1 - The Old House\n\
    We moved to Long Island in the summer of 1962. The house smelled of salt\n\
    and fresh paint, and my father swore he would never move again.\n\
    \n\
    Chapter 2 - Jones Beach Undertow !!!\n\
    The undertow at Jones Beach nearly took me in August. My brother pulled\n\
    me out by the wrist and never mentioned it afterwards.\n\
    \n\
    Chapter 3 - Winter Kitchens\n\
    My mother baked through every snowstorm, and the kitchen windows fogged\n\
    until the beach and the undertow felt like another country.";

/// Save a memoir the way the ingest pipeline does, minus the LLM enrichment.
fn save_memoir(db: &mut Database, title: &str, author: &str, text: &str) -> (i64, Vec<i64>) {
    let splitter = ChapterSplitter::new().unwrap();
    let chapters = splitter.split(text);
    assert!(!chapters.is_empty());

    let memoir_id = db.insert_memoir(title, author).unwrap();
    let chunk_ids = chapters
        .iter()
        .map(|chapter| db.insert_chunk(memoir_id, chapter).unwrap())
        .collect();

    (memoir_id, chunk_ids)
}

#[test]
fn test_save_and_retrieve_memoir() {
    let mut db = Database::memory().unwrap();
    let (memoir_id, chunk_ids) = save_memoir(&mut db, "Tides", "Alan", MEMOIR);

    assert_eq!(chunk_ids.len(), 3);
    assert_eq!(db.find_memoir("Tides", "Alan").unwrap(), Some(memoir_id));
    assert_eq!(db.chunk_count(memoir_id).unwrap(), 3);

    // Every chunk belongs to the memoir and carries its chapter heading
    for (i, chunk_id) in chunk_ids.iter().enumerate() {
        let chunk = db.get_chunk(*chunk_id).unwrap().unwrap();
        assert_eq!(chunk.memoir_id, memoir_id);
        assert!(chunk.content.starts_with(&format!("Chapter {}", i + 1)));
        assert_eq!(chunk.system_prompt, None);
        assert_eq!(chunk.image_path, None);
    }
}

#[test]
fn test_search_returns_best_chapter() {
    let mut db = Database::memory().unwrap();
    let (memoir_id, _) = save_memoir(&mut db, "Tides", "Alan", MEMOIR);

    // The sanitized-phrase form is what the question path produces
    let match_query = sanitize_match_query("Jones Beach undertow!").unwrap();
    let results = db.search_chunks(memoir_id, &match_query, 5).unwrap();

    assert!(!results.is_empty());
    assert!(results[0].1.contains("nearly took me in August"));
}

#[test]
fn test_search_misses_trigger_fallback_corpus() {
    let mut db = Database::memory().unwrap();
    let (memoir_id, _) = save_memoir(&mut db, "Tides", "Alan", MEMOIR);

    let match_query = sanitize_match_query("submarine voyage").unwrap();
    let results = db.search_chunks(memoir_id, &match_query, 5).unwrap();
    assert!(results.is_empty());

    // The fallback context is the whole memoir, chapters in order
    let fallback = db.memoir_content(memoir_id).unwrap();
    assert!(fallback.contains("summer of 1962"));
    assert!(fallback.contains("another country"));
    assert!(
        fallback.find("Chapter 1").unwrap() < fallback.find("Chapter 3").unwrap(),
        "fallback corpus must preserve chapter order"
    );
}

#[test]
fn test_search_is_scoped_per_memoir() {
    let mut db = Database::memory().unwrap();
    let (memoir_id, _) = save_memoir(&mut db, "Tides", "Alan", MEMOIR);
    let (other_id, _) = save_memoir(
        &mut db,
        "Other Shores",
        "Beth",
        "Chapter 1 - Elsewhere\nA different beach, a different undertow.",
    );

    let match_query = sanitize_match_query("undertow").unwrap();

    let ours = db.search_chunks(memoir_id, &match_query, 10).unwrap();
    let theirs = db.search_chunks(other_id, &match_query, 10).unwrap();

    assert!(ours.iter().all(|(_, text)| text.contains("Jones Beach") || text.contains("undertow felt")));
    assert_eq!(theirs.len(), 1);
    assert!(theirs[0].1.contains("different beach"));
}

#[test]
fn test_schema_creation_is_idempotent_on_disk() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("memoirs.db");

    let memoir_id = {
        let mut db = Database::new(&db_path).unwrap();
        let (memoir_id, chunk_ids) = save_memoir(&mut db, "Tides", "Alan", MEMOIR);
        db.set_system_prompt(chunk_ids[0], "a salt-worn house in summer light")
            .unwrap();
        db.set_image_path(chunk_ids[0], "gen_image/abc.png").unwrap();
        memoir_id
    };

    // Reopening runs initialize again over the existing schema
    let db = Database::new(&db_path).unwrap();
    assert_eq!(db.find_memoir("Tides", "Alan").unwrap(), Some(memoir_id));
    assert_eq!(db.chunk_count(memoir_id).unwrap(), 3);
    assert_eq!(db.illustrated_count(memoir_id).unwrap(), 1);

    let match_query = sanitize_match_query("kitchen windows").unwrap();
    let results = db.search_chunks(memoir_id, &match_query, 5).unwrap();
    assert!(!results.is_empty(), "index must survive reopen");
}

#[test]
fn test_stats_after_ingest() {
    let mut db = Database::memory().unwrap();
    let (memoir_id, chunk_ids) = save_memoir(&mut db, "Tides", "Alan", MEMOIR);

    db.set_image_path(chunk_ids[1], "gen_image/beach.png").unwrap();

    let stats = db.get_stats().unwrap();
    assert_eq!(stats.memoir_count, 1);
    assert_eq!(stats.chunk_count, 3);
    assert!(stats.file_size_bytes > 0);
    assert_eq!(db.illustrated_count(memoir_id).unwrap(), 1);
}
