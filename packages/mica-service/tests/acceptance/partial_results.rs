use std::sync::Arc;

use mica_domain::record::SourceType;
use mica_service::{Error, Surface};

use super::{Fault, FaultyStore, Target};

#[tokio::test]
async fn failing_source_is_dropped_and_flagged() {
	let store = FaultyStore {
		inner: super::sample_store(),
		fault: Fault::Fail,
		target: Target::Attachments,
	};
	let service = super::build_service(super::test_config(), Arc::new(store));
	let response = service
		.search(Surface::Protocols, super::params(&[("technique", "two-photon")]))
		.await
		.expect("Search failed.");

	assert!(response.partial);
	assert_eq!(response.total, 2);
	assert!(
		response
			.records
			.iter()
			.all(|record| record.source_type != SourceType::UploadedAttachment)
	);
}

#[tokio::test]
async fn stalled_source_times_out_without_blocking_the_rest() {
	let store = FaultyStore {
		inner: super::sample_store(),
		fault: Fault::Stall,
		target: Target::EmbeddingParents,
	};
	let mut cfg = super::test_config();

	cfg.search.fetch_timeout_ms = 50;

	let service = super::build_service(cfg, Arc::new(store));
	let response = service
		.search(Surface::Protocols, super::params(&[("technique", "two-photon")]))
		.await
		.expect("Search failed.");
	let titles: Vec<&str> = response.records.iter().map(|record| record.title.as_str()).collect();

	assert!(response.partial);
	assert_eq!(titles, vec![
		"Chronic Two-Photon Imaging Through a Cranial Window",
		"Acquisition Setup",
	]);
}

#[tokio::test]
async fn strict_mode_fails_the_request() {
	let store = FaultyStore {
		inner: super::sample_store(),
		fault: Fault::Stall,
		target: Target::EmbeddingParents,
	};
	let mut cfg = super::test_config();

	cfg.search.fetch_timeout_ms = 50;
	cfg.search.partial_results = false;

	let service = super::build_service(cfg, Arc::new(store));
	let err = service
		.search(Surface::Protocols, super::params(&[]))
		.await
		.expect_err("Expected an error.");

	assert!(matches!(err, Error::Timeout { source_name: "embedded_reference", timeout_ms: 50 }));
}

#[tokio::test]
async fn surfaces_without_the_broken_source_are_unaffected() {
	let store = FaultyStore {
		inner: super::sample_store(),
		fault: Fault::Fail,
		target: Target::Attachments,
	};
	let service = super::build_service(super::test_config(), Arc::new(store));
	let response =
		service.search(Surface::Papers, super::params(&[])).await.expect("Search failed.");

	assert!(!response.partial);
	assert_eq!(response.total, 5);
}

#[tokio::test]
async fn partial_facet_counts_are_not_cached() {
	let store = FaultyStore {
		inner: super::sample_store(),
		fault: Fault::Fail,
		target: Target::Attachments,
	};
	let service = super::build_service(super::test_config(), Arc::new(store));
	let first = service
		.facet(Surface::Protocols, "technique", super::params(&[]))
		.await
		.expect("Facet failed.");
	let second = service
		.facet(Surface::Protocols, "technique", super::params(&[]))
		.await
		.expect("Facet failed.");

	assert!(first.partial);
	assert!(!second.cached);
	assert!(service.facet_cache().is_empty());
}

#[tokio::test]
async fn stalled_vocabulary_read_times_out() {
	let store = FaultyStore {
		inner: super::sample_store(),
		fault: Fault::Stall,
		target: Target::Vocabulary,
	};
	let mut cfg = super::test_config();

	cfg.search.fetch_timeout_ms = 50;

	let service = super::build_service(cfg, Arc::new(store));
	let started = std::time::Instant::now();
	let err = service
		.search(Surface::Papers, super::params(&[]))
		.await
		.expect_err("Expected an error.");

	assert!(matches!(err, Error::Timeout { source_name: "vocabulary", timeout_ms: 50 }));
	assert!(started.elapsed() < std::time::Duration::from_secs(2));
}
