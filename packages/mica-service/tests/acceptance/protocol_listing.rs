use mica_domain::record::SourceType;
use mica_service::Surface;

#[tokio::test]
async fn two_photon_protocols_list_primary_first_then_by_title() {
	let service = super::sample_service();
	let response = service
		.search(Surface::Protocols, super::params(&[("technique", "two-photon")]))
		.await
		.expect("Search failed.");
	let titles: Vec<&str> = response.records.iter().map(|record| record.title.as_str()).collect();

	assert_eq!(titles, vec![
		"Chronic Two-Photon Imaging Through a Cranial Window",
		"Acquisition Setup",
		"Head-Fixed Locomotion Rig",
	]);
	assert_eq!(response.total, 3);
	assert_eq!(response.pages, 1);
	assert!(!response.partial);

	let primary = &response.records[0];

	assert_eq!(primary.source_type, SourceType::PrimaryDocument);
	assert_eq!(primary.rank_score, 120);
	assert_eq!(primary.origin_label, "Nature Protocols");

	let upload = &response.records[1];

	assert_eq!(upload.source_type, SourceType::UploadedAttachment);
	assert_eq!(upload.authors.as_deref(), Some("Rivera Lab"));
	assert_eq!(upload.origin_label, "Open Hardware Collective");

	let embedded = &response.records[2];

	assert_eq!(embedded.source_type, SourceType::EmbeddedReference);
	assert_eq!(embedded.id, None);
	assert_eq!(embedded.linked_record_id, Some(103));
	assert_eq!(embedded.origin_label, "protocols.io");
	assert_eq!(embedded.rank_score, 0);
}

#[tokio::test]
async fn stored_slug_matches_every_spelling() {
	let service = super::sample_service();

	for spelling in ["two_photon", "two-photon", "Two-Photon Microscopy", "two photon"] {
		let response = service
			.search(Surface::Protocols, super::params(&[("technique", spelling)]))
			.await
			.expect("Search failed.");

		assert_eq!(response.total, 3, "spelling {spelling:?}");
		assert!(
			response
				.records
				.iter()
				.all(|record| record.has_term("technique", "two_photon")),
			"spelling {spelling:?}"
		);
	}
}

#[tokio::test]
async fn unresolvable_term_matches_nothing() {
	let service = super::sample_service();
	let response = service
		.search(Surface::Protocols, super::params(&[("technique", "electron tomography")]))
		.await
		.expect("Search failed.");

	assert!(response.records.is_empty());
	assert_eq!(response.total, 0);
	assert_eq!(response.pages, 0);
}

#[tokio::test]
async fn unknown_parameters_are_ignored() {
	let service = super::sample_service();
	let filtered = service
		.search(Surface::Protocols, super::params(&[("utm_source", "newsletter")]))
		.await
		.expect("Search failed.");
	let unfiltered =
		service.search(Surface::Protocols, super::params(&[])).await.expect("Search failed.");

	assert_eq!(filtered.total, unfiltered.total);
}

#[tokio::test]
async fn listing_includes_every_source() {
	let service = super::sample_service();
	let response =
		service.search(Surface::Protocols, super::params(&[])).await.expect("Search failed.");
	let count = |source_type: SourceType| {
		response.records.iter().filter(|record| record.source_type == source_type).count()
	};

	// 101 is the only flagged protocol. 103 has one link, 105 two, 104 none it can parse.
	assert_eq!(count(SourceType::PrimaryDocument), 1);
	assert_eq!(count(SourceType::UploadedAttachment), 2);
	assert_eq!(count(SourceType::EmbeddedReference), 3);
	assert_eq!(response.total, 6);
}

#[tokio::test]
async fn pages_slice_the_ranked_list() {
	let service = super::sample_service();
	let all = service.search(Surface::Protocols, super::params(&[])).await.expect("Search failed.");
	let second = service
		.search(Surface::Protocols, super::params(&[("page", "2"), ("per_page", "4")]))
		.await
		.expect("Search failed.");
	let beyond = service
		.search(Surface::Protocols, super::params(&[("page", "9"), ("per_page", "4")]))
		.await
		.expect("Search failed.");

	assert_eq!(second.total, 6);
	assert_eq!(second.pages, 2);
	assert_eq!(second.page, 2);
	assert_eq!(second.records, all.records[4..].to_vec());
	assert!(beyond.records.is_empty());
	assert_eq!(beyond.total, 6);
}

#[tokio::test]
async fn invalid_pagination_is_clamped() {
	let service = super::sample_service();
	let response = service
		.search(Surface::Protocols, super::params(&[("page", "-3"), ("per_page", "0")]))
		.await
		.expect("Search failed.");

	assert_eq!(response.page, 1);
	assert_eq!(response.records.len(), 1);
	assert_eq!(response.pages, 6);
}

#[tokio::test]
async fn vocabulary_lists_every_dimension() {
	let service = super::sample_service();
	let vocabulary = service.vocabulary().await.expect("Vocabulary failed.");
	let dimensions: Vec<&str> = vocabulary.dimensions.keys().map(String::as_str).collect();

	assert_eq!(dimensions, vec!["organism", "software", "technique"]);
	assert_eq!(vocabulary.dimensions["technique"][1].slug, "two_photon");
}

#[tokio::test]
async fn undated_records_list_last_in_either_year_order() {
	let service = super::sample_service();

	for direction in ["asc", "desc"] {
		let params =
			super::params(&[("technique", "confocal"), ("orderby", "year"), ("order", direction)]);
		let response = service
			.search(Surface::Protocols, params)
			.await
			.expect("Search failed.");
		let last = response.records.last().expect("Expected records.");

		assert_eq!(response.total, 3, "order {direction}");
		assert_eq!(last.title, "Fixation Buffer Recipe", "order {direction}");
		assert_eq!(last.year, None);
		assert!(response.records[..2].iter().all(|record| record.year == Some(2020)));
	}
}
