use std::{env, fs};

use mica_domain::predicate::{Predicate, Signal};
use mica_storage::{Error, memory::MemoryStore, models::DocumentScope};

#[test]
fn loads_snapshot_from_disk() {
	let path = env::temp_dir().join(format!("mica_snapshot_{}.json", std::process::id()));

	fs::write(&path, mica_testkit::SAMPLE_CATALOG).expect("Failed to write snapshot.");

	let store = MemoryStore::load(&path).expect("Failed to load snapshot.");

	fs::remove_file(&path).expect("Failed to remove snapshot.");

	assert_eq!(store.vocabulary().terms("technique").len(), 4);
	assert_eq!(store.documents(DocumentScope::protocols(), &Predicate::All).len(), 1);
	assert_eq!(store.attachments(&Predicate::All).len(), 2);
}

#[test]
fn malformed_link_fields_count_as_absent() {
	let store = MemoryStore::new(
		serde_json::from_str(mica_testkit::SAMPLE_CATALOG).expect("Failed to parse sample."),
	);
	let linked = store.documents(DocumentScope::papers(), &Predicate::FlagPresent {
		signal: Signal::ProtocolLinks,
	});
	let mut ids: Vec<i64> = linked.iter().map(|doc| doc.document_id).collect();

	ids.sort_unstable();

	// 102 stores `[]`; 104 stores truncated JSON.
	assert_eq!(ids, vec![103, 105]);
	assert!(
		store
			.embedding_parents(&Predicate::All)
			.iter()
			.all(|doc| doc.document_id != 104)
	);
}

#[test]
fn missing_snapshot_is_a_read_error() {
	let err = MemoryStore::load("/nonexistent/mica/catalog.json").expect_err("Expected an error.");

	assert!(matches!(err, Error::ReadSnapshot { .. }));
}
